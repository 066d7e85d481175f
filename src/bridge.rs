use {
    crate::{
        Amount,
        Credentials,
        MessageId,
        MessagingNetwork,
        PayloadName,
        SignerFactory,
        TransactionId,
        TransferConfig,
        Vaa,
        error::{Error, Result},
        get_signer,
        sign_send_wait,
    },
    std::{fmt::Debug, time::Duration},
    tokio::time::{sleep, timeout},
    tracing::{Level, debug, info, instrument, trace, warn},
};

mod result;

pub use result::*;

/// Runs native token transfers between two chains of a messaging network.
///
/// Every call to [`Bridge::transfer`] is independent: it builds fresh signers,
/// submits fresh transactions and is not idempotent.
#[derive(Clone)]
pub struct Bridge<N, S> {
    network: N,
    signers: S,
    credentials: Credentials,
    attestation_timeout: Duration,
    poll_interval: Duration,
}

impl<N: MessagingNetwork, S> Debug for Bridge<N, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bridge[{} timeout={:?}]",
            self.network.network(),
            self.attestation_timeout
        )
    }
}

impl<N: MessagingNetwork, S: SignerFactory> Bridge<N, S> {
    /// Creates a bridge with the default attestation timing (60s timeout,
    /// polling every second)
    pub fn new(network: N, signers: S, credentials: Credentials) -> Self {
        let defaults = TransferConfig::default();
        Self {
            network,
            signers,
            credentials,
            attestation_timeout: defaults.attestation_timeout,
            poll_interval: defaults.poll_interval,
        }
    }

    /// Takes attestation timing from `config`, rejecting an invalid one
    pub fn with_config(mut self, config: &TransferConfig) -> Result<Self> {
        config.validate()?;
        self.attestation_timeout = config.attestation_timeout;
        self.poll_interval = config.poll_interval;
        Ok(self)
    }

    /// Sets how long to wait for the guardians to sign. Must be non-zero.
    pub fn with_attestation_timeout(mut self, attestation_timeout: Duration) -> Result<Self> {
        if attestation_timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "attestation timeout must be non-zero".to_string(),
            ));
        }
        self.attestation_timeout = attestation_timeout;
        Ok(self)
    }

    /// Sets the pause between two VAA requests. Must be non-zero.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Result<Self> {
        if poll_interval.is_zero() {
            return Err(Error::InvalidConfig("poll interval must be non-zero".to_string()));
        }
        self.poll_interval = poll_interval;
        Ok(self)
    }

    /// Returns the messaging network transfers run on
    pub fn network(&self) -> &N {
        &self.network
    }

    /// Returns how long [`Bridge::get_vaa`] waits before giving up
    pub fn attestation_timeout(&self) -> Duration {
        self.attestation_timeout
    }

    /// Returns the pause between two VAA requests
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Polls the network for the VAA of `id` until it shows up or the
    /// attestation timeout runs out.
    ///
    /// Transport errors while polling are treated like a VAA that is not there
    /// yet. Any other error, including a reply that cannot be decoded, ends
    /// the wait.
    #[instrument(skip(self), level = Level::INFO)]
    pub async fn get_vaa(&self, id: &MessageId, payload: PayloadName) -> Result<Vaa> {
        info!(%id, "Polling for attestation ...");

        let poll = async {
            let mut attempt: u32 = 0;
            loop {
                attempt += 1;
                trace!(attempt, "Getting attestation ...");
                match self.network.fetch_vaa(id, payload).await {
                    Ok(Some(vaa)) => {
                        debug!(attempt, "Attestation received");
                        return Ok(vaa);
                    }
                    Ok(None) => {
                        debug!(attempt, poll_interval = ?self.poll_interval, "Attestation pending, waiting before retrying");
                    }
                    Err(Error::Network(e)) => {
                        warn!(attempt, error = %e, "Attestation request failed, waiting before retrying");
                    }
                    Err(e) => return Err(e),
                }
                sleep(self.poll_interval).await;
            }
        };

        timeout(self.attestation_timeout, poll)
            .await
            .map_err(|_| Error::AttestationTimeout {
                timeout: self.attestation_timeout,
            })?
    }

    /// Runs a transfer and folds any failure into the returned result
    #[instrument(skip(self, request), fields(request = %request), level = Level::INFO)]
    pub async fn transfer(&self, request: TransferRequest) -> TransferResult {
        let mut source_tx = None;
        match self.run(&request, &mut source_tx).await {
            Ok(receipt) => {
                info!(%receipt, "transfer finished");
                TransferResult::completed(&request, &receipt)
            }
            Err(e) => {
                warn!(error = %e, source_tx = ?source_tx, "transfer failed");
                TransferResult::failed(&request, &e, source_tx.as_ref())
            }
        }
    }

    /// Same as [`Bridge::transfer`] for raw chain names and amount as typed
    /// into the form
    pub async fn transfer_between(
        &self,
        source_chain: &str,
        destination_chain: &str,
        amount: &str,
    ) -> TransferResult {
        match TransferRequest::parse(source_chain, destination_chain, amount) {
            Ok(request) => self.transfer(request).await,
            Err(e) => {
                warn!(error = %e, "rejected transfer request");
                TransferResult::rejected(source_chain, destination_chain, amount, &e)
            }
        }
    }

    /// Runs a transfer and returns the typed error on failure
    pub async fn try_transfer(&self, request: &TransferRequest) -> Result<TransferReceipt> {
        self.run(request, &mut None).await
    }

    async fn run(
        &self,
        request: &TransferRequest,
        source_tx: &mut Option<TransactionId>,
    ) -> Result<TransferReceipt> {
        let source = self.network.chain(request.source_chain())?;
        let destination = self.network.chain(request.destination_chain())?;

        let sender = get_signer(source.clone(), &self.credentials, &self.signers).await?;
        let receiver = get_signer(destination.clone(), &self.credentials, &self.signers).await?;
        debug!(sender = %sender.address, receiver = %receiver.address, "signers ready");

        let amount = Amount::parse(request.amount(), source.native_token_decimals())?;
        info!("transferring {amount} from {} to {}", sender.address, receiver.address);

        let source_bridge = source.token_bridge().await?;
        let transfer = source_bridge
            .transfer(&sender.address, &receiver.address, amount.units)
            .await?;
        let txids = sign_send_wait(source.as_ref(), transfer, sender.signer.as_ref()).await?;
        info!(?txids, "Sent");
        let sent = last_txid(txids)?;
        *source_tx = Some(sent.clone());

        let message = source
            .parse_transaction(&sent)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::MessageNotFound {
                txid: sent.txid.clone(),
            })?;
        info!(%message, "Wormhole message");

        let vaa = self.get_vaa(&message, PayloadName::TokenBridgeTransfer).await?;

        let destination_bridge = destination.token_bridge().await?;
        let redeem = destination_bridge.redeem(&receiver.address, &vaa).await?;
        let redeem_txids =
            sign_send_wait(destination.as_ref(), redeem, receiver.signer.as_ref()).await?;
        info!(txids = ?redeem_txids, "Redeemed");
        let redeemed = last_txid(redeem_txids)?;

        let is_completed = destination_bridge.is_transfer_completed(&vaa).await?;
        info!(is_completed, "Transfer completed");

        Ok(TransferReceipt {
            source_tx: sent,
            destination_tx: redeemed,
            attestation: vaa,
            is_completed,
        })
    }
}

fn last_txid(txids: Vec<TransactionId>) -> Result<TransactionId> {
    txids.into_iter().last().ok_or_else(|| Error::TransactionFailed {
        reason: "no transaction ids returned".to_string(),
    })
}
