use {
    crate::error::{Error, Result},
    alloy_chains::NamedChain,
    serde::{Deserialize, Serialize},
    std::{fmt::Display, str::FromStr},
};

/// Execution environment family of a chain. Signers, address encodings and
/// native token precision are all decided per platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Solana,
    Evm,
    Algorand,
    Sui,
    Aptos,
    Cosmwasm,
    Near,
    Btc,
}

impl Platform {
    /// Decimal precision of the platform's native gas token
    pub const fn native_token_decimals(&self) -> u8 {
        match self {
            Platform::Solana => 9,
            Platform::Evm => 18,
            Platform::Algorand => 6,
            Platform::Sui => 9,
            Platform::Aptos => 8,
            Platform::Cosmwasm => 6,
            Platform::Near => 24,
            Platform::Btc => 8,
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
    Devnet,
}

impl Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            _ => Err(Error::InvalidConfig(format!("unknown network {s}"))),
        }
    }
}

macro_rules! wormhole_chains {
    ($($name:ident = $id:literal => $platform:ident),+ $(,)?) => {
        /// Chains known to the Wormhole network, keyed by their wormhole chain id
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Chain {
            $($name),+
        }

        impl Chain {
            pub const ALL: &'static [Chain] = &[$(Chain::$name),+];

            /// The u16 chain id used inside VAAs and by the guardian API
            pub const fn wormhole_chain_id(&self) -> u16 {
                match self {
                    $(Chain::$name => $id),+
                }
            }

            pub const fn platform(&self) -> Platform {
                match self {
                    $(Chain::$name => Platform::$platform),+
                }
            }

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Chain::$name => stringify!($name)),+
                }
            }
        }
    };
}

wormhole_chains! {
    Solana = 1 => Solana,
    Ethereum = 2 => Evm,
    Terra = 3 => Cosmwasm,
    Bsc = 4 => Evm,
    Polygon = 5 => Evm,
    Avalanche = 6 => Evm,
    Oasis = 7 => Evm,
    Algorand = 8 => Algorand,
    Aurora = 9 => Evm,
    Fantom = 10 => Evm,
    Karura = 11 => Evm,
    Acala = 12 => Evm,
    Klaytn = 13 => Evm,
    Celo = 14 => Evm,
    Near = 15 => Near,
    Moonbeam = 16 => Evm,
    Neon = 17 => Evm,
    Terra2 = 18 => Cosmwasm,
    Injective = 19 => Cosmwasm,
    Osmosis = 20 => Cosmwasm,
    Sui = 21 => Sui,
    Aptos = 22 => Aptos,
    Arbitrum = 23 => Evm,
    Optimism = 24 => Evm,
    Gnosis = 25 => Evm,
    Pythnet = 26 => Solana,
    Xpla = 28 => Cosmwasm,
    Btc = 29 => Btc,
    Base = 30 => Evm,
    Sei = 32 => Cosmwasm,
    Rootstock = 33 => Evm,
    Scroll = 34 => Evm,
    Mantle = 35 => Evm,
    Blast = 36 => Evm,
    Xlayer = 37 => Evm,
    Linea = 38 => Evm,
    Berachain = 39 => Evm,
    Seievm = 40 => Evm,
    Snaxchain = 43 => Evm,
    Unichain = 44 => Evm,
    Worldchain = 45 => Evm,
    Wormchain = 3104 => Cosmwasm,
    Cosmoshub = 4000 => Cosmwasm,
    Evmos = 4001 => Cosmwasm,
    Kujira = 4002 => Cosmwasm,
    Neutron = 4003 => Cosmwasm,
    Celestia = 4004 => Cosmwasm,
    Stargaze = 4005 => Cosmwasm,
    Seda = 4006 => Cosmwasm,
    Dymension = 4007 => Cosmwasm,
    Provenance = 4008 => Cosmwasm,
    Sepolia = 10002 => Evm,
    ArbitrumSepolia = 10003 => Evm,
    BaseSepolia = 10004 => Evm,
    OptimismSepolia = 10005 => Evm,
    Holesky = 10006 => Evm,
    PolygonSepolia = 10007 => Evm,
    MonadDevnet = 10008 => Evm,
}

impl Chain {
    pub const fn native_token_decimals(&self) -> u8 {
        self.platform().native_token_decimals()
    }

    /// Chains that only exist on test networks
    pub const fn testnet_only(&self) -> bool {
        self.wormhole_chain_id() >= 10_000
    }

    /// Whether the chain can be used on `network`
    pub const fn is_supported(&self, network: Network) -> bool {
        match network {
            Network::Mainnet => !self.testnet_only(),
            Network::Testnet | Network::Devnet => true,
        }
    }
}

impl Chain {
    /// The EVM chain behind this wormhole chain on `network`, for wiring up
    /// RPC providers
    pub fn evm_chain(&self, network: Network) -> Result<NamedChain> {
        let named = match (network, *self) {
            (Network::Mainnet, Chain::Ethereum) => NamedChain::Mainnet,
            (Network::Mainnet, Chain::Bsc) => NamedChain::BinanceSmartChain,
            (Network::Mainnet, Chain::Polygon) => NamedChain::Polygon,
            (Network::Mainnet, Chain::Avalanche) => NamedChain::Avalanche,
            (Network::Mainnet, Chain::Fantom) => NamedChain::Fantom,
            (Network::Mainnet, Chain::Celo) => NamedChain::Celo,
            (Network::Mainnet, Chain::Moonbeam) => NamedChain::Moonbeam,
            (Network::Mainnet, Chain::Arbitrum) => NamedChain::Arbitrum,
            (Network::Mainnet, Chain::Optimism) => NamedChain::Optimism,
            (Network::Mainnet, Chain::Gnosis) => NamedChain::Gnosis,
            (Network::Mainnet, Chain::Base) => NamedChain::Base,
            (Network::Mainnet, Chain::Scroll) => NamedChain::Scroll,
            (Network::Mainnet, Chain::Mantle) => NamedChain::Mantle,
            (Network::Mainnet, Chain::Blast) => NamedChain::Blast,
            (Network::Mainnet, Chain::Linea) => NamedChain::Linea,
            (Network::Mainnet, Chain::Unichain) => NamedChain::Unichain,
            // Testnets
            (Network::Testnet, Chain::Bsc) => NamedChain::BinanceSmartChainTestnet,
            (Network::Testnet, Chain::Avalanche) => NamedChain::AvalancheFuji,
            (Network::Testnet, Chain::Sepolia) => NamedChain::Sepolia,
            (Network::Testnet, Chain::ArbitrumSepolia) => NamedChain::ArbitrumSepolia,
            (Network::Testnet, Chain::BaseSepolia) => NamedChain::BaseSepolia,
            (Network::Testnet, Chain::OptimismSepolia) => NamedChain::OptimismSepolia,
            (Network::Testnet, Chain::Holesky) => NamedChain::Holesky,
            (Network::Testnet, Chain::PolygonSepolia) => NamedChain::PolygonAmoy,
            // tilt runs ganache
            (Network::Devnet, Chain::Ethereum) => NamedChain::Dev,
            _ => {
                return Err(Error::ChainNotSupported {
                    chain: format!("{self} as an EVM chain on {network}"),
                });
            }
        };
        Ok(named)
    }
}

impl Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = Error;

    /// Case-insensitive. `Evm` is accepted as an alias for Ethereum, which is
    /// what the transfer form submits for its Ethereum option.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("evm") {
            return Ok(Chain::Ethereum);
        }
        Chain::ALL
            .iter()
            .find(|chain| chain.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| Error::ChainNotSupported {
                chain: s.to_string(),
            })
    }
}

impl TryFrom<u16> for Chain {
    type Error = Error;

    fn try_from(id: u16) -> Result<Self> {
        Chain::ALL
            .iter()
            .find(|chain| chain.wormhole_chain_id() == id)
            .copied()
            .ok_or_else(|| Error::ChainNotSupported {
                chain: id.to_string(),
            })
    }
}
