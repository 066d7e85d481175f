use {
    crate::{
        Chain,
        ChainAddress,
        GuardianApi,
        MessageId,
        Network,
        PayloadName,
        Signer,
        TransactionId,
        TransferConfig,
        Vaa,
        error::{Error, Result},
    },
    alloy_primitives::U256,
    async_trait::async_trait,
    std::{collections::HashMap, fmt::Debug, sync::Arc},
    tracing::{Level, debug, info, instrument},
};

/// A transaction built by a bridge client, waiting for a signer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub chain: Chain,
    /// Human readable label such as `TokenBridge.transferNative`
    pub description: String,
    /// Platform specific serialized transaction
    pub payload: Vec<u8>,
}

/// Token bridge contract client bound to one chain
#[async_trait]
pub trait TokenBridge: Send + Sync {
    /// Builds the transactions that lock (or burn) `amount` of the native
    /// token and emit a transfer message for `recipient`
    async fn transfer(
        &self,
        sender: &ChainAddress,
        recipient: &ChainAddress,
        amount: U256,
    ) -> Result<Vec<UnsignedTransaction>>;

    /// Builds the transactions that consume `vaa` on this chain
    async fn redeem(&self, sender: &ChainAddress, vaa: &Vaa) -> Result<Vec<UnsignedTransaction>>;

    async fn is_transfer_completed(&self, vaa: &Vaa) -> Result<bool>;
}

/// RPC access to one chain
#[async_trait]
pub trait ChainContext: Send + Sync {
    fn chain(&self) -> Chain;

    fn native_token_decimals(&self) -> u8 {
        self.chain().native_token_decimals()
    }

    async fn token_bridge(&self) -> Result<Arc<dyn TokenBridge>>;

    /// Extracts the wormhole messages emitted by a confirmed transaction
    async fn parse_transaction(&self, txid: &TransactionId) -> Result<Vec<MessageId>>;
}

/// The cross-chain messaging network as seen by a transfer
#[async_trait]
pub trait MessagingNetwork: Send + Sync {
    fn network(&self) -> Network;

    /// Resolves the context for `chain`
    fn chain(&self, chain: Chain) -> Result<Arc<dyn ChainContext>>;

    /// Asks once for the signed VAA of a message. `Ok(None)` means the
    /// guardians have not produced it yet.
    async fn fetch_vaa(&self, id: &MessageId, payload: PayloadName) -> Result<Option<Vaa>>;
}

#[async_trait]
impl<T: MessagingNetwork + ?Sized> MessagingNetwork for Arc<T> {
    fn network(&self) -> Network {
        (**self).network()
    }

    fn chain(&self, chain: Chain) -> Result<Arc<dyn ChainContext>> {
        (**self).chain(chain)
    }

    async fn fetch_vaa(&self, id: &MessageId, payload: PayloadName) -> Result<Option<Vaa>> {
        (**self).fetch_vaa(id, payload).await
    }
}

/// Signs and submits `txs` on `chain`, returning the ids in submission order.
/// When a bridge needs several transactions only the last id is the one that
/// carries the bridge message.
#[instrument(skip_all, fields(chain = %chain.chain(), count = txs.len()), level = Level::DEBUG)]
pub async fn sign_send_wait(
    chain: &dyn ChainContext,
    txs: Vec<UnsignedTransaction>,
    signer: &dyn Signer,
) -> Result<Vec<TransactionId>> {
    if signer.chain() != chain.chain() {
        return Err(Error::SignerChainMismatch {
            signer: signer.chain(),
            chain: chain.chain(),
        });
    }
    if txs.is_empty() {
        return Err(Error::TransactionFailed {
            reason: format!("bridge produced no transactions on {}", chain.chain()),
        });
    }
    if let Some(tx) = txs.iter().find(|tx| tx.chain != chain.chain()) {
        return Err(Error::TransactionFailed {
            reason: format!(
                "{} built for {} cannot be sent on {}",
                tx.description,
                tx.chain,
                chain.chain()
            ),
        });
    }
    for tx in &txs {
        debug!(description = %tx.description, "signing");
    }

    let txids = signer.sign_and_send(txs).await?;
    if txids.is_empty() {
        return Err(Error::TransactionFailed {
            reason: format!("signer returned no transaction ids on {}", chain.chain()),
        });
    }
    Ok(txids)
}

/// Wormhole network client: registered chain contexts plus the guardian API
#[derive(Clone)]
pub struct Wormhole {
    network: Network,
    api: GuardianApi,
    chains: HashMap<Chain, Arc<dyn ChainContext>>,
}

impl Debug for Wormhole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut chains: Vec<_> = self.chains.keys().collect();
        chains.sort();
        write!(f, "Wormhole[{}]{chains:?}", self.network)
    }
}

impl Wormhole {
    pub fn new(config: &TransferConfig) -> Self {
        Self {
            network: config.network,
            api: GuardianApi::new(config.api_url.clone()),
            chains: HashMap::new(),
        }
    }

    /// Registers the context for a chain, replacing any earlier one
    pub fn with_chain(mut self, context: Arc<dyn ChainContext>) -> Self {
        info!(chain = %context.chain(), "registering chain");
        self.chains.insert(context.chain(), context);
        self
    }

    pub fn api(&self) -> &GuardianApi {
        &self.api
    }
}

#[async_trait]
impl MessagingNetwork for Wormhole {
    fn network(&self) -> Network {
        self.network
    }

    fn chain(&self, chain: Chain) -> Result<Arc<dyn ChainContext>> {
        if !chain.is_supported(self.network) {
            return Err(Error::ChainNotSupported {
                chain: format!("{chain} on {}", self.network),
            });
        }
        self.chains
            .get(&chain)
            .cloned()
            .ok_or_else(|| Error::ChainNotSupported {
                chain: chain.to_string(),
            })
    }

    async fn fetch_vaa(&self, id: &MessageId, payload: PayloadName) -> Result<Option<Vaa>> {
        Ok(self
            .api
            .fetch_signed_vaa(id)
            .await?
            .map(|bytes| Vaa {
                id: *id,
                payload_name: payload,
                bytes,
            }))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::UniversalAddress,
        base64::{Engine, engine::general_purpose::STANDARD},
        httpmock::prelude::*,
        serde_json::json,
        std::sync::Mutex,
    };

    struct StubContext(Chain);

    #[async_trait]
    impl ChainContext for StubContext {
        fn chain(&self) -> Chain {
            self.0
        }

        async fn token_bridge(&self) -> Result<Arc<dyn TokenBridge>> {
            Err(Error::Provider("no bridge".to_string()))
        }

        async fn parse_transaction(&self, _txid: &TransactionId) -> Result<Vec<MessageId>> {
            Ok(vec![])
        }
    }

    struct RecordingSigner {
        chain: Chain,
        sent: Mutex<Vec<UnsignedTransaction>>,
        returns: usize,
    }

    impl RecordingSigner {
        fn new(chain: Chain, returns: usize) -> Self {
            Self {
                chain,
                sent: Mutex::new(vec![]),
                returns,
            }
        }
    }

    #[async_trait]
    impl Signer for RecordingSigner {
        fn chain(&self) -> Chain {
            self.chain
        }

        fn address(&self) -> String {
            "0x1".to_string()
        }

        async fn sign_and_send(&self, txs: Vec<UnsignedTransaction>) -> Result<Vec<TransactionId>> {
            self.sent.lock().unwrap().extend(txs);
            Ok((0..self.returns)
                .map(|i| TransactionId {
                    chain: self.chain,
                    txid: format!("tx{i}"),
                })
                .collect())
        }
    }

    fn tx(chain: Chain) -> UnsignedTransaction {
        UnsignedTransaction {
            chain,
            description: "TokenBridge.transferNative".to_string(),
            payload: vec![1],
        }
    }

    #[tokio::test]
    async fn test_sign_send_wait() -> anyhow::Result<()> {
        let signer = RecordingSigner::new(Chain::Aptos, 2);
        let txids =
            sign_send_wait(&StubContext(Chain::Aptos), vec![tx(Chain::Aptos)], &signer).await?;
        assert_eq!(txids.len(), 2);
        assert_eq!(txids.last().unwrap().txid, "tx1");
        assert_eq!(signer.sent.lock().unwrap().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_send_wait_rejects_foreign_signer() {
        let signer = RecordingSigner::new(Chain::Solana, 1);
        let result = sign_send_wait(&StubContext(Chain::Aptos), vec![tx(Chain::Aptos)], &signer).await;
        assert!(matches!(result, Err(Error::SignerChainMismatch { .. })));
        assert!(signer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sign_send_wait_rejects_empty_and_foreign_txs() {
        let signer = RecordingSigner::new(Chain::Aptos, 1);
        let ctx = StubContext(Chain::Aptos);
        assert!(matches!(
            sign_send_wait(&ctx, vec![], &signer).await,
            Err(Error::TransactionFailed { .. })
        ));
        assert!(matches!(
            sign_send_wait(&ctx, vec![tx(Chain::Sui)], &signer).await,
            Err(Error::TransactionFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_sign_send_wait_no_ids() {
        let signer = RecordingSigner::new(Chain::Aptos, 0);
        let result = sign_send_wait(&StubContext(Chain::Aptos), vec![tx(Chain::Aptos)], &signer).await;
        assert!(matches!(result, Err(Error::TransactionFailed { .. })));
    }

    #[test]
    fn test_chain_lookup() {
        let wh = Wormhole::new(&TransferConfig::new(Network::Testnet))
            .with_chain(Arc::new(StubContext(Chain::Solana)));
        assert_eq!(wh.chain(Chain::Solana).unwrap().chain(), Chain::Solana);
        assert!(matches!(
            wh.chain(Chain::Aptos),
            Err(Error::ChainNotSupported { .. })
        ));
    }

    #[test]
    fn test_testnet_chain_rejected_on_mainnet() {
        let wh = Wormhole::new(&TransferConfig::new(Network::Mainnet))
            .with_chain(Arc::new(StubContext(Chain::Sepolia)));
        assert!(matches!(
            wh.chain(Chain::Sepolia),
            Err(Error::ChainNotSupported { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_vaa_through_api() -> anyhow::Result<()> {
        let server = MockServer::start();
        let id = MessageId {
            chain: Chain::Solana,
            emitter: UniversalAddress::from([1u8; 32]),
            sequence: 9,
        };
        server.mock(|when, then| {
            when.method(GET)
                .path(format!("/v1/signed_vaa/1/{}/9", "01".repeat(32)));
            then.status(200)
                .json_body(json!({ "vaaBytes": STANDARD.encode(b"vaa") }));
        });
        let mut config = TransferConfig::new(Network::Testnet);
        config.api_url = server.base_url();

        let wh = Wormhole::new(&config);
        let vaa = wh
            .fetch_vaa(&id, PayloadName::TokenBridgeTransfer)
            .await?
            .expect("vaa should be available");
        assert_eq!(vaa.id, id);
        assert_eq!(vaa.bytes, b"vaa".to_vec());
        assert_eq!(vaa.payload_name, PayloadName::TokenBridgeTransfer);
        Ok(())
    }
}
