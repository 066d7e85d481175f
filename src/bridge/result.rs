use {
    crate::{
        Chain,
        TransactionId,
        Vaa,
        error::{Error, Result},
    },
    serde::Serialize,
    std::fmt::Display,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    #[default]
    Native,
}

/// One transfer as submitted by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    source_chain: Chain,
    destination_chain: Chain,
    amount: String,
    asset: Asset,
}

impl TransferRequest {
    pub fn new(
        source_chain: Chain,
        destination_chain: Chain,
        amount: impl Into<String>,
    ) -> Result<Self> {
        if source_chain == destination_chain {
            return Err(Error::InvalidRequest(format!(
                "source and destination are both {source_chain}"
            )));
        }
        Ok(Self {
            source_chain,
            destination_chain,
            amount: amount.into().trim().to_string(),
            asset: Asset::Native,
        })
    }

    /// Builds a request from the names picked in the transfer form
    pub fn parse(source_chain: &str, destination_chain: &str, amount: &str) -> Result<Self> {
        Self::new(source_chain.parse()?, destination_chain.parse()?, amount)
    }

    pub fn source_chain(&self) -> Chain {
        self.source_chain
    }

    pub fn destination_chain(&self) -> Chain {
        self.destination_chain
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn asset(&self) -> Asset {
        self.asset
    }
}

impl Display for TransferRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} native {} -> {}",
            self.amount, self.source_chain, self.destination_chain
        )
    }
}

/// Everything a finished transfer produced
#[derive(Clone, Debug)]
pub struct TransferReceipt {
    pub source_tx: TransactionId,
    pub destination_tx: TransactionId,
    pub attestation: Vaa,
    pub is_completed: bool,
}

impl Display for TransferReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Send: {}, Redeem: {}, Attestation: {}, Completed: {}",
            self.source_tx, self.destination_tx, self.attestation, self.is_completed
        )
    }
}

/// Outcome handed to the UI. Only built through [`TransferResult::completed`],
/// [`TransferResult::failed`] and [`TransferResult::rejected`], so a failure
/// always carries an error and never a destination transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_tx_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination_tx_id: Option<String>,
    source_chain: String,
    destination_chain: String,
    amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TransferResult {
    pub fn completed(request: &TransferRequest, receipt: &TransferReceipt) -> Self {
        Self {
            success: true,
            source_tx_id: Some(receipt.source_tx.txid.clone()),
            destination_tx_id: Some(receipt.destination_tx.txid.clone()),
            source_chain: request.source_chain.to_string(),
            destination_chain: request.destination_chain.to_string(),
            amount: request.amount.clone(),
            is_completed: Some(receipt.is_completed),
            error: None,
        }
    }

    /// A transfer that failed after it started. `source_tx` is kept when the
    /// source transaction already landed so the funds can be tracked down.
    pub fn failed(
        request: &TransferRequest,
        error: &Error,
        source_tx: Option<&TransactionId>,
    ) -> Self {
        Self {
            success: false,
            source_tx_id: source_tx.map(|tx| tx.txid.clone()),
            destination_tx_id: None,
            source_chain: request.source_chain.to_string(),
            destination_chain: request.destination_chain.to_string(),
            amount: request.amount.clone(),
            is_completed: None,
            error: Some(error_message(error)),
        }
    }

    /// A request that could not even be built from the user's input
    pub fn rejected(
        source_chain: &str,
        destination_chain: &str,
        amount: &str,
        error: &Error,
    ) -> Self {
        Self {
            success: false,
            source_tx_id: None,
            destination_tx_id: None,
            source_chain: source_chain.to_string(),
            destination_chain: destination_chain.to_string(),
            amount: amount.to_string(),
            is_completed: None,
            error: Some(error_message(error)),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn source_tx_id(&self) -> Option<&str> {
        self.source_tx_id.as_deref()
    }

    pub fn destination_tx_id(&self) -> Option<&str> {
        self.destination_tx_id.as_deref()
    }

    pub fn source_chain(&self) -> &str {
        &self.source_chain
    }

    pub fn destination_chain(&self) -> &str {
        &self.destination_chain
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn is_completed(&self) -> Option<bool> {
        self.is_completed
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

fn error_message(error: &Error) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        format!("{error:?}")
    } else {
        message
    }
}
