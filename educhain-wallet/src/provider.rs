//! Wallet provider abstraction.
//!
//! [`WalletProvider`] is the seam between the connector state machine and
//! whatever actually holds the key: an injected browser wallet in the
//! original deployment, a local private-key signer here. Errors carry the
//! EIP-1193 codes the connector branches on (4001 user rejection, 4902
//! unrecognized chain).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use educhain_core::constants::{WALLET_ERROR_UNRECOGNIZED_CHAIN, WALLET_ERROR_USER_REJECTED};
use educhain_core::{ChainConfig, EduChainError};

/// Signer client bound to an established session.
///
/// Registry writes are submitted through this, never through the
/// read-only provider.
pub type SessionSigner = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Errors surfaced by a wallet provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The user declined the request (EIP-1193 code 4001).
    #[error("user rejected the request")]
    UserRejected,

    /// The requested chain has not been added to the wallet (EIP-3085
    /// code 4902).
    #[error("unrecognized chain")]
    UnrecognizedChain,

    /// Any other provider-level failure.
    #[error("provider error: {0}")]
    Rpc(String),
}

impl ProviderError {
    /// The EIP-1193 error code for this condition, when one exists.
    pub fn code(&self) -> Option<i64> {
        match self {
            ProviderError::UserRejected => Some(WALLET_ERROR_USER_REJECTED),
            ProviderError::UnrecognizedChain => Some(WALLET_ERROR_UNRECOGNIZED_CHAIN),
            ProviderError::Rpc(_) => None,
        }
    }
}

/// Result alias for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// The injected-wallet request surface the connector negotiates with.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// `eth_requestAccounts`: asks the user to authorize accounts.
    async fn request_accounts(&self) -> ProviderResult<Vec<Address>>;

    /// `eth_chainId`: the provider's currently active network.
    async fn chain_id(&self) -> ProviderResult<u64>;

    /// `wallet_switchEthereumChain`: asks the provider to activate the
    /// given chain. Fails with [`ProviderError::UnrecognizedChain`] when
    /// the wallet does not know the chain.
    async fn switch_chain(&self, chain_id: u64) -> ProviderResult<()>;

    /// `wallet_addEthereumChain`: registers a network definition with
    /// the wallet.
    async fn add_chain(&self, config: &ChainConfig) -> ProviderResult<()>;
}

/// Decides whether a user-facing request is approved.
///
/// The argument names the request ("account authorization"). Returning
/// false is the user-declined path.
pub type ApprovalHook = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Headless wallet provider backed by a local private-key signer.
///
/// Holds the set of chain definitions the wallet knows and an active
/// chain slot. `switch_chain` fails with `UnrecognizedChain` until the
/// chain has been added; `add_chain` registers the definition and
/// activates it, matching injected-wallet behavior.
pub struct LocalWalletProvider {
    wallet: LocalWallet,
    known_chains: RwLock<HashMap<u64, ChainConfig>>,
    active_chain_id: RwLock<u64>,
    approval: Option<ApprovalHook>,
}

impl LocalWalletProvider {
    /// Creates a provider with `active` as its current network.
    pub fn new(wallet: LocalWallet, active: ChainConfig) -> Self {
        let active_id = active.chain_id;
        let mut known = HashMap::new();
        known.insert(active_id, active);

        Self {
            wallet,
            known_chains: RwLock::new(known),
            active_chain_id: RwLock::new(active_id),
            approval: None,
        }
    }

    /// Installs an approval hook consulted before account authorization.
    pub fn with_approval_hook(mut self, hook: ApprovalHook) -> Self {
        self.approval = Some(hook);
        self
    }

    /// The signing account.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Builds the signer client for the provider's active chain.
    ///
    /// Fails with `ConfigError` when the active chain has no usable RPC
    /// endpoint.
    pub fn signer(&self) -> educhain_core::Result<Arc<SessionSigner>> {
        let active_id = *self.active_chain_id.read();
        let chains = self.known_chains.read();
        let chain = chains
            .get(&active_id)
            .ok_or_else(|| EduChainError::ConfigError(format!("unknown chain {active_id}")))?;

        let provider = Provider::<Http>::try_from(chain.rpc_url.as_str())
            .map_err(|e| EduChainError::ConfigError(format!("bad RPC URL: {e}")))?;

        let wallet = self.wallet.clone().with_chain_id(active_id);
        Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
    }
}

#[async_trait]
impl WalletProvider for LocalWalletProvider {
    async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
        if let Some(hook) = &self.approval {
            if !hook("account authorization") {
                return Err(ProviderError::UserRejected);
            }
        }
        Ok(vec![self.wallet.address()])
    }

    async fn chain_id(&self) -> ProviderResult<u64> {
        Ok(*self.active_chain_id.read())
    }

    async fn switch_chain(&self, chain_id: u64) -> ProviderResult<()> {
        if !self.known_chains.read().contains_key(&chain_id) {
            return Err(ProviderError::UnrecognizedChain);
        }
        *self.active_chain_id.write() = chain_id;
        debug!(chain_id, "switched active chain");
        Ok(())
    }

    async fn add_chain(&self, config: &ChainConfig) -> ProviderResult<()> {
        let chain_id = config.chain_id;
        self.known_chains.write().insert(chain_id, config.clone());
        *self.active_chain_id.write() = chain_id;
        debug!(chain_id, name = %config.chain_name, "added chain definition");
        Ok(())
    }
}
