use {
    crate::{
        Chain,
        ChainAddress,
        ChainContext,
        Credential,
        Credentials,
        Platform,
        TransactionId,
        UnsignedTransaction,
        error::{Error, Result},
    },
    async_trait::async_trait,
    std::{fmt::Debug, sync::Arc},
    tracing::{Level, debug, instrument},
};

/// Holds a credential and can authorize transactions on one chain
#[async_trait]
pub trait Signer: Send + Sync {
    fn chain(&self) -> Chain;

    /// Native encoding of the signing account
    fn address(&self) -> String;

    /// Signs and submits every transaction, waiting for each to land
    async fn sign_and_send(&self, txs: Vec<UnsignedTransaction>) -> Result<Vec<TransactionId>>;
}

/// Builds platform specific signers, e.g. a keypair signer for Solana or a
/// local private key signer for EVM chains
#[async_trait]
pub trait SignerFactory: Send + Sync {
    async fn signer(
        &self,
        platform: Platform,
        chain: &dyn ChainContext,
        credential: &Credential,
    ) -> Result<Arc<dyn Signer>>;
}

#[async_trait]
impl<T: SignerFactory + ?Sized> SignerFactory for Arc<T> {
    async fn signer(
        &self,
        platform: Platform,
        chain: &dyn ChainContext,
        credential: &Credential,
    ) -> Result<Arc<dyn Signer>> {
        (**self).signer(platform, chain, credential).await
    }
}

/// A signer together with the chain it signs for and its address. Lives for
/// one transfer.
#[derive(Clone)]
pub struct SignerHandle {
    pub chain: Arc<dyn ChainContext>,
    pub signer: Arc<dyn Signer>,
    pub address: ChainAddress,
}

impl Debug for SignerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SignerHandle[{}]", self.address)
    }
}

/// Resolves the platform of `chain`, loads its credential and asks `factory`
/// for a signer.
///
/// Fails with [`Error::UnsupportedPlatform`] for platforms without signer
/// support and [`Error::MissingCredential`] when the key is not configured,
/// both before anything touches the network.
#[instrument(skip_all, fields(chain = %chain.chain()), level = Level::DEBUG)]
pub async fn get_signer<F: SignerFactory + ?Sized>(
    chain: Arc<dyn ChainContext>,
    credentials: &Credentials,
    factory: &F,
) -> Result<SignerHandle> {
    let platform = chain.chain().platform();
    match platform {
        Platform::Solana | Platform::Evm | Platform::Algorand | Platform::Sui | Platform::Aptos => {}
        platform => return Err(Error::UnsupportedPlatform { platform }),
    }
    let credential = credentials.for_platform(platform)?;
    let signer = factory.signer(platform, chain.as_ref(), &credential).await?;
    if signer.chain() != chain.chain() {
        return Err(Error::SignerChainMismatch {
            signer: signer.chain(),
            chain: chain.chain(),
        });
    }
    let address = ChainAddress::new(chain.chain(), signer.address())?;
    debug!(%address, "signer ready");

    Ok(SignerHandle {
        chain,
        signer,
        address,
    })
}
