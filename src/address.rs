use {
    crate::{
        Chain,
        Platform,
        error::{Error, Result},
    },
    alloy_primitives::{FixedBytes, hex},
    serde::{Deserialize, Serialize},
    std::fmt::Display,
};

/// The 32 byte, left padded address form wormhole uses for emitters and
/// recipients regardless of the chain's native encoding.
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniversalAddress(pub FixedBytes<32>);

impl UniversalAddress {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    fn left_padded(bytes: &[u8]) -> Self {
        let mut padded = FixedBytes::<32>::ZERO;
        padded[32 - bytes.len()..].copy_from_slice(bytes);
        Self(padded)
    }
}

impl Display for UniversalAddress {
    /// Lowercase hex without a `0x` prefix, the form the guardian API expects
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl From<[u8; 32]> for UniversalAddress {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes.into())
    }
}

impl From<alloy_primitives::Address> for UniversalAddress {
    fn from(addr: alloy_primitives::Address) -> Self {
        Self(addr.into_word())
    }
}

/// An address in the native encoding of its chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainAddress {
    pub chain: Chain,
    pub address: String,
}

impl ChainAddress {
    /// Validates `address` against the encoding used by the chain's platform
    pub fn new(chain: Chain, address: impl Into<String>) -> Result<Self> {
        let addr = Self {
            chain,
            address: address.into(),
        };
        match chain.platform() {
            Platform::Evm | Platform::Solana | Platform::Sui | Platform::Aptos => {
                addr.to_universal()?;
            }
            _ if addr.address.trim().is_empty() => return Err(addr.invalid()),
            _ => {}
        }
        Ok(addr)
    }

    /// Converts to the 32 byte universal form for platforms with a known
    /// encoding
    pub fn to_universal(&self) -> Result<UniversalAddress> {
        match self.chain.platform() {
            Platform::Evm => self
                .address
                .parse::<alloy_primitives::Address>()
                .map(UniversalAddress::from)
                .map_err(|_| self.invalid()),
            Platform::Solana => {
                let bytes = bs58::decode(&self.address)
                    .into_vec()
                    .map_err(|_| self.invalid())?;
                let bytes: [u8; 32] = bytes.try_into().map_err(|_| self.invalid())?;
                Ok(bytes.into())
            }
            Platform::Sui | Platform::Aptos => {
                let stripped = self
                    .address
                    .strip_prefix("0x")
                    .ok_or_else(|| self.invalid())?;
                // Move addresses may drop leading zeros
                let even = if stripped.len() % 2 == 1 {
                    format!("0{stripped}")
                } else {
                    stripped.to_string()
                };
                let bytes = hex::decode(even).map_err(|_| self.invalid())?;
                if bytes.is_empty() || bytes.len() > 32 {
                    return Err(self.invalid());
                }
                Ok(UniversalAddress::left_padded(&bytes))
            }
            platform => Err(Error::UnsupportedPlatform { platform }),
        }
    }

    fn invalid(&self) -> Error {
        Error::InvalidAddress {
            chain: self.chain,
            address: self.address.clone(),
        }
    }
}

impl Display for ChainAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.chain, self.address)
    }
}
