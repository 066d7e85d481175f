use {
    alloy_primitives::U256,
    async_trait::async_trait,
    std::{
        collections::HashMap,
        env,
        sync::{
            Arc,
            Mutex,
            Once,
            atomic::{AtomicUsize, Ordering},
        },
    },
    tracing_subscriber::{EnvFilter, fmt::format::FmtSpan},
    wormsoul_bridge::{
        APTOS_PRIVATE_KEY,
        Bridge,
        Chain,
        ChainAddress,
        ChainContext,
        Credential,
        Credentials,
        ETH_PRIVATE_KEY,
        Error,
        ExecutionContext,
        MessageId,
        MessagingNetwork,
        Network,
        PayloadName,
        Platform,
        Result,
        SOL_PRIVATE_KEY,
        Signer,
        SignerFactory,
        TokenBridge,
        TransactionId,
        UniversalAddress,
        UnsignedTransaction,
        Vaa,
    },
};

pub static INIT: Once = Once::new();

#[allow(clippy::unwrap_used, clippy::missing_panics_doc)]
pub fn setup() {
    INIT.call_once(|| {
        if env::var("CI").is_err() {
            // only load .env if not in CI
            if dotenvy::dotenv_override().is_err() {
                eprintln!("no .env file");
            }
        }
        tracing_subscriber::fmt()
            .with_target(false)
            .with_level(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    });
}

/// Ordered log of everything the mocks were asked to do
#[derive(Clone, Default)]
pub struct Events(Arc<Mutex<Vec<String>>>);

impl Events {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn any_starts_with(&self, prefix: &str) -> bool {
        self.all().iter().any(|e| e.starts_with(prefix))
    }
}

pub fn address_for(chain: Chain) -> &'static str {
    match chain.platform() {
        Platform::Solana => "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
        Platform::Evm => "0x3ee18B2214AFF97000D974cf647E7C347E8fa585",
        Platform::Aptos => "0x1",
        Platform::Sui => "0x2",
        _ => "ALGORANDADDRESS",
    }
}

pub struct MockTokenBridge {
    chain: Chain,
    events: Events,
    completed: bool,
}

#[async_trait]
impl TokenBridge for MockTokenBridge {
    async fn transfer(
        &self,
        sender: &ChainAddress,
        recipient: &ChainAddress,
        amount: U256,
    ) -> Result<Vec<UnsignedTransaction>> {
        self.events.push(format!(
            "transfer:{}:{}->{}:{amount}",
            self.chain, sender.chain, recipient.chain
        ));
        // token accounts first, the bridge call last
        Ok(vec![
            UnsignedTransaction {
                chain: self.chain,
                description: "Token.createAccount".to_string(),
                payload: vec![0],
            },
            UnsignedTransaction {
                chain: self.chain,
                description: "TokenBridge.transferNative".to_string(),
                payload: amount.to_be_bytes_vec(),
            },
        ])
    }

    async fn redeem(&self, sender: &ChainAddress, vaa: &Vaa) -> Result<Vec<UnsignedTransaction>> {
        self.events
            .push(format!("redeem:{}:{}:{}", self.chain, sender.chain, vaa.id));
        Ok(vec![UnsignedTransaction {
            chain: self.chain,
            description: "TokenBridge.completeTransfer".to_string(),
            payload: vaa.bytes.clone(),
        }])
    }

    async fn is_transfer_completed(&self, _vaa: &Vaa) -> Result<bool> {
        self.events.push(format!("completed:{}", self.chain));
        Ok(self.completed)
    }
}

pub struct MockChain {
    chain: Chain,
    bridge: Arc<MockTokenBridge>,
    events: Events,
    emits_message: bool,
}

impl MockChain {
    pub fn new(chain: Chain, events: Events, emits_message: bool) -> Arc<Self> {
        Arc::new(Self {
            chain,
            bridge: Arc::new(MockTokenBridge {
                chain,
                events: events.clone(),
                completed: true,
            }),
            events,
            emits_message,
        })
    }
}

/// Emitter every mock chain reports its messages from
pub const EMITTER: [u8; 32] = [9u8; 32];

#[async_trait]
impl ChainContext for MockChain {
    fn chain(&self) -> Chain {
        self.chain
    }

    async fn token_bridge(&self) -> Result<Arc<dyn TokenBridge>> {
        Ok(self.bridge.clone())
    }

    async fn parse_transaction(&self, txid: &TransactionId) -> Result<Vec<MessageId>> {
        self.events.push(format!("parse:{}:{}", self.chain, txid.txid));
        if !self.emits_message {
            return Ok(vec![]);
        }
        Ok(vec![MessageId {
            chain: self.chain,
            emitter: UniversalAddress::from(EMITTER),
            sequence: 7,
        }])
    }
}

/// How the mock guardian network answers VAA requests
#[derive(Clone, Copy, Debug)]
pub enum Attestations {
    /// Signed after this many pending answers
    ReadyAfter(usize),
    /// Always pending
    Never,
    /// Never answers at all
    Hang,
    /// Guardians refuse to sign
    Fail,
}

pub struct MockNetwork {
    chains: HashMap<Chain, Arc<MockChain>>,
    attestations: Attestations,
    pub fetches: AtomicUsize,
    pub events: Events,
}

impl MockNetwork {
    pub fn new(attestations: Attestations) -> Self {
        Self {
            chains: HashMap::new(),
            attestations,
            fetches: AtomicUsize::new(0),
            events: Events::default(),
        }
    }

    pub fn with_chain(self, chain: Chain) -> Self {
        self.with_chain_emitting(chain, true)
    }

    pub fn with_chain_emitting(mut self, chain: Chain, emits_message: bool) -> Self {
        let context = MockChain::new(chain, self.events.clone(), emits_message);
        self.chains.insert(chain, context);
        self
    }
}

#[async_trait]
impl MessagingNetwork for MockNetwork {
    fn network(&self) -> Network {
        Network::Testnet
    }

    fn chain(&self, chain: Chain) -> Result<Arc<dyn ChainContext>> {
        self.chains
            .get(&chain)
            .map(|c| c.clone() as Arc<dyn ChainContext>)
            .ok_or_else(|| Error::ChainNotSupported {
                chain: chain.to_string(),
            })
    }

    async fn fetch_vaa(&self, id: &MessageId, payload: PayloadName) -> Result<Option<Vaa>> {
        let attempt = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        match self.attestations {
            Attestations::ReadyAfter(pending) if attempt > pending => Ok(Some(Vaa {
                id: *id,
                payload_name: payload,
                bytes: b"signed".to_vec(),
            })),
            Attestations::ReadyAfter(_) | Attestations::Never => Ok(None),
            Attestations::Hang => std::future::pending().await,
            Attestations::Fail => Err(Error::AttestationFailed {
                reason: "guardians refused".to_string(),
            }),
        }
    }
}

pub struct MockSigner {
    chain: Chain,
    events: Events,
    sent: Arc<AtomicUsize>,
}

#[async_trait]
impl Signer for MockSigner {
    fn chain(&self) -> Chain {
        self.chain
    }

    fn address(&self) -> String {
        address_for(self.chain).to_string()
    }

    async fn sign_and_send(&self, txs: Vec<UnsignedTransaction>) -> Result<Vec<TransactionId>> {
        self.events.push(format!("send:{}:{}", self.chain, txs.len()));
        Ok(txs
            .iter()
            .map(|_| TransactionId {
                chain: self.chain,
                txid: format!(
                    "{}-tx-{}",
                    self.chain,
                    self.sent.fetch_add(1, Ordering::SeqCst)
                ),
            })
            .collect())
    }
}

pub struct MockSignerFactory {
    events: Events,
    sent: Arc<AtomicUsize>,
}

impl MockSignerFactory {
    pub fn new(events: Events) -> Self {
        Self {
            events,
            sent: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl SignerFactory for MockSignerFactory {
    async fn signer(
        &self,
        platform: Platform,
        chain: &dyn ChainContext,
        credential: &Credential,
    ) -> Result<Arc<dyn Signer>> {
        self.events
            .push(format!("signer:{platform}:{}", credential.expose()));
        Ok(Arc::new(MockSigner {
            chain: chain.chain(),
            events: self.events.clone(),
            sent: self.sent.clone(),
        }))
    }
}

pub fn server_credentials() -> Credentials {
    Credentials::new(ExecutionContext::Server)
        .with_key(SOL_PRIVATE_KEY, "sol-key")
        .with_key(APTOS_PRIVATE_KEY, "aptos-key")
        .with_key(ETH_PRIVATE_KEY, "eth-key")
}

pub fn bridge(
    network: MockNetwork,
    credentials: Credentials,
) -> (Bridge<Arc<MockNetwork>, MockSignerFactory>, Arc<MockNetwork>) {
    let network = Arc::new(network);
    let signers = MockSignerFactory::new(network.events.clone());
    (
        Bridge::new(network.clone(), signers, credentials),
        network,
    )
}
