use {
    crate::{
        Chain,
        Network,
        UniversalAddress,
        error::{Error, Result},
    },
    base64::{Engine, engine::general_purpose::STANDARD},
    reqwest::{Client, StatusCode},
    serde::{Deserialize, Serialize},
    std::fmt::Display,
    tracing::{Level, debug, instrument, trace},
};

/// Guardian REST API environment URLs
///
/// See <https://wormholescan.io>
pub const WORMHOLESCAN_API: &str = "https://api.wormholescan.io";
pub const WORMHOLESCAN_API_TESTNET: &str = "https://api.testnet.wormholescan.io";
/// Guardian started by the local tilt devnet
pub const GUARDIAN_API_DEVNET: &str = "http://localhost:7071";

impl Network {
    pub fn guardian_api_url(&self) -> &'static str {
        match self {
            Network::Mainnet => WORMHOLESCAN_API,
            Network::Testnet => WORMHOLESCAN_API_TESTNET,
            Network::Devnet => GUARDIAN_API_DEVNET,
        }
    }
}

/// Identifies one message emitted through the core bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId {
    pub chain: Chain,
    pub emitter: UniversalAddress,
    pub sequence: u64,
}

impl Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.chain.wormhole_chain_id(),
            self.emitter,
            self.sequence
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId {
    pub chain: Chain,
    pub txid: String,
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.txid)
    }
}

/// Protocol and payload layout a VAA is expected to carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadName {
    TokenBridgeTransfer,
    TokenBridgeTransferWithPayload,
    TokenBridgeAttestMeta,
}

impl PayloadName {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PayloadName::TokenBridgeTransfer => "TokenBridge:Transfer",
            PayloadName::TokenBridgeTransferWithPayload => "TokenBridge:TransferWithPayload",
            PayloadName::TokenBridgeAttestMeta => "TokenBridge:AttestMeta",
        }
    }
}

impl Display for PayloadName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signed VAA. The bytes are handed to the destination bridge untouched.
#[derive(Clone, PartialEq, Eq)]
pub struct Vaa {
    pub id: MessageId,
    pub payload_name: PayloadName,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Vaa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vaa")
            .field("id", &self.id)
            .field("payload_name", &self.payload_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Display for Vaa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {} bytes", self.id, self.payload_name, self.bytes.len())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignedVaaResponse {
    vaa_bytes: String,
}

/// Client for the guardian `signed_vaa` endpoint
#[derive(Clone, Debug)]
pub struct GuardianApi {
    base_url: String,
    client: Client,
}

impl GuardianApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn for_network(network: Network) -> Self {
        Self::new(network.guardian_api_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Constructs the signed VAA URL for a message id
    pub fn signed_vaa_url(&self, id: &MessageId) -> String {
        format!("{}/v1/signed_vaa/{id}", self.base_url)
    }

    /// Fetches a signed VAA once.
    ///
    /// Returns `Ok(None)` while the guardians have not signed the message yet
    /// (404) or the API is rate limiting (429). Callers decide how long to keep
    /// asking. A 200 whose body is not a signed VAA is [`Error::Json`].
    #[instrument(skip(self), level = Level::DEBUG)]
    pub async fn fetch_signed_vaa(&self, id: &MessageId) -> Result<Option<Vec<u8>>> {
        let url = self.signed_vaa_url(id);
        let response = self.client.get(&url).send().await?;
        trace!(status = ?response.status());

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("VAA not found yet");
                return Ok(None);
            }
            StatusCode::TOO_MANY_REQUESTS => {
                debug!("Rate limit exceeded");
                return Ok(None);
            }
            _ => {}
        }
        response.error_for_status_ref()?;

        // transport errors stay retryable, a body we cannot read is not
        let body = response.bytes().await?;
        let body: SignedVaaResponse = serde_json::from_slice(&body)?;
        if body.vaa_bytes.is_empty() {
            return Err(Error::AttestationFailed {
                reason: format!("empty VAA returned for {id}"),
            });
        }
        Ok(Some(STANDARD.decode(body.vaa_bytes)?))
    }
}
