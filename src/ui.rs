use {
    crate::{
        Bridge,
        Chain,
        MessagingNetwork,
        SignerFactory,
        TransferRequest,
        TransferResult,
        error::{Error, Result},
    },
    serde::Serialize,
    std::fmt::Display,
    tracing::{debug, info},
};

/// An entry in the chain dropdowns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainOption {
    /// Value submitted with the form
    pub value: &'static str,
    pub label: &'static str,
}

impl ChainOption {
    /// Returns the chain this option submits
    pub fn chain(&self) -> Result<Chain> {
        self.value.parse()
    }
}

pub const CHAIN_OPTIONS: &[ChainOption] = &[
    ChainOption {
        value: "Evm",
        label: "Ethereum",
    },
    ChainOption {
        value: "Solana",
        label: "Solana",
    },
    ChainOption {
        value: "Avalanche",
        label: "Avalanche",
    },
    ChainOption {
        value: "Aptos",
        label: "Aptos",
    },
    ChainOption {
        value: "Algorand",
        label: "Algorand",
    },
    ChainOption {
        value: "Sui",
        label: "Sui",
    },
];

/// Toast shown once a transfer settles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success {
        source_tx: String,
        destination_tx: String,
        destination_chain: String,
        completed: bool,
    },
    Failure {
        error: String,
    },
}

impl Notification {
    /// Returns the toast heading
    pub fn title(&self) -> &'static str {
        match self {
            Notification::Success { .. } => "Transfer sent",
            Notification::Failure { .. } => "Transfer failed",
        }
    }

    /// Returns the toast body: tx ids and completion on success, the error
    /// message on failure
    pub fn description(&self) -> String {
        match self {
            Notification::Success {
                source_tx,
                destination_tx,
                destination_chain,
                completed,
            } => format!(
                "Source tx {source_tx}, redeemed on {destination_chain} in {destination_tx}. Completed: {}",
                if *completed { "yes" } else { "no" }
            ),
            Notification::Failure { error } => error.clone(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notification::Success { .. })
    }
}

impl From<&TransferResult> for Notification {
    fn from(result: &TransferResult) -> Self {
        match (result.success(), result.source_tx_id(), result.destination_tx_id()) {
            (true, Some(source_tx), Some(destination_tx)) => Notification::Success {
                source_tx: source_tx.to_string(),
                destination_tx: destination_tx.to_string(),
                destination_chain: result.destination_chain().to_string(),
                completed: result.is_completed().unwrap_or(false),
            },
            _ => Notification::Failure {
                error: result
                    .error()
                    .filter(|e| !e.is_empty())
                    .unwrap_or("transfer did not complete")
                    .to_string(),
            },
        }
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title(), self.description())
    }
}

/// State of the transfer form. The only mutable UI state; requests leave it
/// as immutable [`TransferRequest`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferForm {
    from_chain: String,
    to_chain: String,
    amount: String,
    is_loading: bool,
    wallet_connected: bool,
}

impl Default for TransferForm {
    fn default() -> Self {
        Self {
            from_chain: "Solana".to_string(),
            to_chain: "Aptos".to_string(),
            amount: String::new(),
            is_loading: false,
            wallet_connected: false,
        }
    }
}

impl TransferForm {
    /// Sets the source chain, as picked in the dropdown
    pub fn set_from_chain(&mut self, value: impl Into<String>) {
        self.from_chain = value.into();
    }

    /// Sets the destination chain, as picked in the dropdown
    pub fn set_to_chain(&mut self, value: impl Into<String>) {
        self.to_chain = value.into();
    }

    /// Sets the amount as typed, validated only on submit
    pub fn set_amount(&mut self, value: impl Into<String>) {
        self.amount = value.into();
    }

    /// Reflects the wallet connection state
    pub fn set_wallet_connected(&mut self, connected: bool) {
        self.wallet_connected = connected;
    }

    /// Returns the source chain
    pub fn from_chain(&self) -> &str {
        &self.from_chain
    }

    /// Returns the destination chain
    pub fn to_chain(&self) -> &str {
        &self.to_chain
    }

    /// Returns the amount as typed
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Returns true while a submitted transfer has not settled
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Returns true when the transfer button is enabled
    pub fn can_submit(&self) -> bool {
        self.wallet_connected && !self.is_loading
    }

    /// Returns the transfer button text for the current state
    pub fn button_label(&self) -> &'static str {
        if self.is_loading {
            "Transferring..."
        } else if self.wallet_connected {
            "Transfer"
        } else {
            "Connect Wallet to Transfer"
        }
    }

    /// Builds the request from the current inputs and locks the form.
    ///
    /// Nothing changes when the input is rejected.
    pub fn submit(&mut self) -> Result<TransferRequest> {
        if !self.wallet_connected {
            return Err(Error::InvalidRequest("wallet not connected".to_string()));
        }
        if self.is_loading {
            return Err(Error::InvalidRequest(
                "a transfer is already in progress".to_string(),
            ));
        }
        let request = TransferRequest::parse(&self.from_chain, &self.to_chain, &self.amount)?;
        self.is_loading = true;
        debug!(%request, "form submitted");
        Ok(request)
    }

    /// Unlocks the form and turns the outcome into a notification
    pub fn settle(&mut self, result: &TransferResult) -> Notification {
        self.is_loading = false;
        let notification = Notification::from(result);
        info!(%notification, "transfer settled");
        notification
    }

    /// Submit, run the transfer and settle. Every outcome ends in a
    /// notification, including input the form rejected.
    pub async fn run<N: MessagingNetwork, S: SignerFactory>(
        &mut self,
        bridge: &Bridge<N, S>,
    ) -> Notification {
        let request = match self.submit() {
            Ok(request) => request,
            Err(e) => {
                let result =
                    TransferResult::rejected(&self.from_chain, &self.to_chain, &self.amount, &e);
                return Notification::from(&result);
            }
        };
        let result = bridge.transfer(request).await;
        self.settle(&result)
    }
}

/// A coin in the demo portfolio
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemeCoin {
    pub name: &'static str,
    pub balance: u64,
    pub icon: &'static str,
    /// USD
    pub price: f64,
    /// 0..=100
    pub trend: u8,
}

impl MemeCoin {
    /// Returns the USD value of the balance
    pub fn value(&self) -> f64 {
        self.balance as f64 * self.price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    pub coins: Vec<MemeCoin>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self {
            coins: vec![
                MemeCoin {
                    name: "SOUL1",
                    balance: 1000,
                    icon: "https://img-cdn.magiceden.dev/rs:fill:400:0:0/plain/https://arweave.net/PysUShwUPfn6ZEDhQODhtXzd9PI2yU-VnZP4MAfa0SY",
                    price: 0.07,
                    trend: 60,
                },
                MemeCoin {
                    name: "SOUL2",
                    balance: 5_000_000,
                    icon: "https://img-cdn.magiceden.dev/rs:fill:400:0:0/plain/https://arweave.net/5J6Gmt5xda_Xo9zG4kizSePImrwYMSmaHE39bXMlwf4",
                    price: 0.000008,
                    trend: 45,
                },
                MemeCoin {
                    name: "SOUL3",
                    balance: 420_000,
                    icon: "https://img-cdn.magiceden.dev/rs:fill:400:0:0/plain/https://arweave.net/nGPJTCIh7zFmoPHIErA7AI3VqF-uS3oAVGGT0S3i_cE",
                    price: 0.000001,
                    trend: 75,
                },
            ],
        }
    }
}

impl Portfolio {
    /// Returns the USD value of every coin together
    pub fn total_value(&self) -> f64 {
        self.coins.iter().map(MemeCoin::value).sum()
    }

    pub fn get(&self, name: &str) -> Option<&MemeCoin> {
        self.coins.iter().find(|coin| coin.name == name)
    }
}
