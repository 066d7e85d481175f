use {
    crate::{
        Network,
        Platform,
        error::{Error, Result},
    },
    std::{collections::HashMap, env, time::Duration},
    tracing::debug,
};

pub const SOL_PRIVATE_KEY: &str = "SOL_PRIVATE_KEY";
pub const ETH_PRIVATE_KEY: &str = "ETH_PRIVATE_KEY";
pub const ALGORAND_PRIVATE_KEY: &str = "ALGORAND_PRIVATE_KEY";
pub const SUI_PRIVATE_KEY: &str = "SUI_PRIVATE_KEY";
pub const APTOS_PRIVATE_KEY: &str = "APTOS_PRIVATE_KEY";

pub const WORMHOLE_NETWORK: &str = "WORMHOLE_NETWORK";
pub const WORMHOLE_API_URL: &str = "WORMHOLE_API_URL";
pub const ATTESTATION_TIMEOUT_SECS: &str = "ATTESTATION_TIMEOUT_SECS";
pub const ATTESTATION_POLL_INTERVAL_MS: &str = "ATTESTATION_POLL_INTERVAL_MS";

/// How long to wait for the guardians to sign a transfer
pub const DEFAULT_ATTESTATION_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Environment variable holding the signing key for a platform, if signing on
/// that platform is supported at all
pub const fn credential_key(platform: Platform) -> Option<&'static str> {
    match platform {
        Platform::Solana => Some(SOL_PRIVATE_KEY),
        Platform::Evm => Some(ETH_PRIVATE_KEY),
        Platform::Algorand => Some(ALGORAND_PRIVATE_KEY),
        Platform::Sui => Some(SUI_PRIVATE_KEY),
        Platform::Aptos => Some(APTOS_PRIVATE_KEY),
        Platform::Cosmwasm | Platform::Near | Platform::Btc => None,
    }
}

/// Where the code runs. Browsers have no access to secrets, so every lookup
/// there yields an empty key and signing is left to the connected wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    Browser,
    Server,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        if cfg!(target_arch = "wasm32") {
            ExecutionContext::Browser
        } else {
            ExecutionContext::Server
        }
    }
}

/// A private key loaded from configuration
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Per platform signing keys
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    context: ExecutionContext,
    keys: HashMap<&'static str, Credential>,
}

impl Credentials {
    pub fn new(context: ExecutionContext) -> Self {
        Self {
            context,
            keys: HashMap::new(),
        }
    }

    /// Reads every known key from the process environment. Absent keys are
    /// only reported once a platform actually needs them.
    pub fn from_env() -> Self {
        Self::from_env_in(ExecutionContext::default())
    }

    pub fn from_env_in(context: ExecutionContext) -> Self {
        Self::from_lookup(context, |key| env::var(key).ok())
    }

    /// Same as [`Credentials::from_env_in`] with variables read through
    /// `lookup`
    pub fn from_lookup(context: ExecutionContext, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut credentials = Self::new(context);
        if context == ExecutionContext::Browser {
            return credentials;
        }
        for key in [
            SOL_PRIVATE_KEY,
            ETH_PRIVATE_KEY,
            ALGORAND_PRIVATE_KEY,
            SUI_PRIVATE_KEY,
            APTOS_PRIVATE_KEY,
        ] {
            if let Some(value) = lookup(key) {
                credentials.keys.insert(key, Credential::new(value));
            }
        }
        debug!(loaded = credentials.keys.len(), "credentials loaded");
        credentials
    }

    pub fn with_key(mut self, key: &'static str, secret: impl Into<String>) -> Self {
        self.keys.insert(key, Credential::new(secret));
        self
    }

    pub fn context(&self) -> ExecutionContext {
        self.context
    }

    /// Looks up the key for `platform`.
    ///
    /// In a browser this short-circuits to an empty credential. On a server a
    /// missing or empty key is an error.
    pub fn for_platform(&self, platform: Platform) -> Result<Credential> {
        let key = credential_key(platform).ok_or(Error::UnsupportedPlatform { platform })?;
        if self.context == ExecutionContext::Browser {
            return Ok(Credential::new(""));
        }
        match self.keys.get(key) {
            Some(credential) if !credential.is_empty() => Ok(credential.clone()),
            _ => Err(Error::MissingCredential { key }),
        }
    }
}

/// Settings for talking to the wormhole network
#[derive(Debug, Clone)]
pub struct TransferConfig {
    pub network: Network,
    pub api_url: String,
    pub attestation_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self::new(Network::default())
    }
}

impl TransferConfig {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            api_url: network.guardian_api_url().to_string(),
            attestation_timeout: DEFAULT_ATTESTATION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Defaults for the network in `WORMHOLE_NETWORK` (testnet if unset),
    /// overridden by any of the optional variables that are set
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`TransferConfig::from_env`] with variables read through
    /// `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let network = match lookup(WORMHOLE_NETWORK) {
            Some(network) => network.parse()?,
            None => Network::default(),
        };
        let mut config = Self::new(network);
        if let Some(url) = lookup(WORMHOLE_API_URL) {
            config.api_url = url.trim().to_string();
        }
        if let Some(secs) = lookup(ATTESTATION_TIMEOUT_SECS) {
            config.attestation_timeout =
                Duration::from_secs(parse_number(ATTESTATION_TIMEOUT_SECS, &secs)?);
        }
        if let Some(ms) = lookup(ATTESTATION_POLL_INTERVAL_MS) {
            config.poll_interval =
                Duration::from_millis(parse_number(ATTESTATION_POLL_INTERVAL_MS, &ms)?);
        }
        config.validate()?;
        debug!(network = %config.network, api_url = %config.api_url, "transfer config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.attestation_timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "attestation timeout must be non-zero".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::InvalidConfig("poll interval must be non-zero".to_string()));
        }
        if self.api_url.is_empty() {
            return Err(Error::InvalidConfig("guardian API url is empty".to_string()));
        }
        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| Error::InvalidConfig(format!("{key}={value}: {e}")))
}
