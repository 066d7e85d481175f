use {
    crate::{Chain, Platform},
    alloy_primitives::utils::UnitsError,
    std::time::Duration,
    thiserror::Error,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Chain not supported: {chain}")]
    ChainNotSupported { chain: String },

    #[error("Unrecognized platform: {platform}")]
    UnsupportedPlatform { platform: Platform },

    #[error("Missing env var {key}, did you forget to set values in '.env'?")]
    MissingCredential { key: &'static str },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid transfer request: {0}")]
    InvalidRequest(String),

    #[error("Invalid amount {amount}: {reason}")]
    InvalidAmount { amount: String, reason: String },

    #[error("Invalid {chain} address: {address}")]
    InvalidAddress { chain: Chain, address: String },

    #[error("Units error: {0}")]
    Units(#[from] UnitsError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Signer for {signer} cannot sign on {chain}")]
    SignerChainMismatch { signer: Chain, chain: Chain },

    #[error("No wormhole message found in transaction {txid}")]
    MessageNotFound { txid: String },

    #[error("Timeout waiting for attestation after {timeout:?}")]
    AttestationTimeout { timeout: Duration },

    #[error("Attestation failed: {reason}")]
    AttestationFailed { reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),
}

pub type Result<T> = std::result::Result<T, Error>;
