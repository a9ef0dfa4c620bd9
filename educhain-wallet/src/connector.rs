//! Wallet connection state machine.
//!
//! `connect()` negotiates with the provider until its active network
//! matches the target chain descriptor, adding the network definition to
//! the wallet when it is unknown. The connector is an explicit context
//! object handed to the orchestrators; it holds the one piece of
//! cross-call state (the current session) behind a lock.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use educhain_core::{ChainConfig, EduChainError, Result, WalletSession};

use crate::provider::{ProviderError, WalletProvider};

/// States of the connection machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectState {
    /// No session established.
    Disconnected,
    /// Waiting for the user to authorize accounts.
    RequestingAccounts,
    /// Comparing the provider's active network against the target.
    CheckingNetwork,
    /// Asked the provider to switch networks.
    SwitchingNetwork,
    /// Asked the provider to register the target network.
    AddingNetwork,
    /// Session established on the target chain.
    Connected,
}

/// Negotiates a [`WalletSession`] against the target chain.
pub struct WalletConnector {
    chain: ChainConfig,
    provider: Option<Arc<dyn WalletProvider>>,
    state: RwLock<ConnectState>,
    session: RwLock<Option<WalletSession>>,
}

impl WalletConnector {
    /// Creates a connector for `chain` backed by `provider`.
    pub fn new(chain: ChainConfig, provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            chain,
            provider: Some(provider),
            state: RwLock::new(ConnectState::Disconnected),
            session: RwLock::new(None),
        }
    }

    /// Creates a connector for an environment with no wallet capability;
    /// every `connect()` fails with `ProviderUnavailable`.
    pub fn without_provider(chain: ChainConfig) -> Self {
        Self {
            chain,
            provider: None,
            state: RwLock::new(ConnectState::Disconnected),
            session: RwLock::new(None),
        }
    }

    /// The target chain descriptor.
    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// Current machine state.
    pub fn state(&self) -> ConnectState {
        *self.state.read()
    }

    /// The established session, if any.
    pub fn session(&self) -> Option<WalletSession> {
        self.session.read().clone()
    }

    /// True when a session is established on the target chain.
    pub fn is_connected(&self) -> bool {
        self.session().map(|s| s.is_active()).unwrap_or(false)
    }

    /// Tears down the session.
    pub fn disconnect(&self) {
        *self.session.write() = None;
        self.set_state(ConnectState::Disconnected);
        info!("wallet session torn down");
    }

    /// Establishes (or re-validates) a session on the target chain.
    ///
    /// Calling this while already connected is safe: the account prompt
    /// is skipped and only the network state is re-validated.
    #[instrument(skip(self), fields(target = self.chain.chain_id))]
    pub async fn connect(&self) -> Result<WalletSession> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(EduChainError::ProviderUnavailable)?
            .clone();

        let existing_account = self.session.read().as_ref().map(|s| s.account);
        let account = match existing_account {
            // Idempotent re-connect: no second account prompt
            Some(account) => account,
            None => {
                self.set_state(ConnectState::RequestingAccounts);
                let accounts = provider
                    .request_accounts()
                    .await
                    .map_err(|e| match e {
                        ProviderError::UserRejected => {
                            EduChainError::UserRejected("account authorization declined".into())
                        }
                        other => EduChainError::NetworkError(other.to_string()),
                    })
                    .inspect_err(|_| self.set_state(ConnectState::Disconnected))?;
                *accounts.first().ok_or_else(|| {
                    EduChainError::UserRejected("no accounts authorized".into())
                })?
            }
        };

        self.set_state(ConnectState::CheckingNetwork);
        let mut chain_id = self.read_chain_id(&*provider).await?;

        if chain_id != self.chain.chain_id {
            debug!(active = chain_id, "provider on wrong network, reconciling");
            self.reconcile_network(&*provider).await.inspect_err(|_| {
                self.set_state(ConnectState::Disconnected);
            })?;

            chain_id = self.read_chain_id(&*provider).await?;
            if chain_id != self.chain.chain_id {
                self.set_state(ConnectState::Disconnected);
                return Err(EduChainError::NetworkSwitchFailed(format!(
                    "provider stayed on chain {chain_id}"
                )));
            }
        }

        let session = WalletSession::new(account, chain_id, self.chain.chain_id);
        *self.session.write() = Some(session.clone());
        self.set_state(ConnectState::Connected);
        info!(account = %format!("{account:#x}"), chain_id, "wallet session established");

        Ok(session)
    }

    /// One switch, or add-then-switch when the wallet does not know the
    /// target chain. Any other failure is fatal for this attempt.
    async fn reconcile_network(&self, provider: &dyn WalletProvider) -> Result<()> {
        self.set_state(ConnectState::SwitchingNetwork);
        match provider.switch_chain(self.chain.chain_id).await {
            Ok(()) => Ok(()),
            Err(ProviderError::UnrecognizedChain) => {
                warn!(
                    chain_id = self.chain.chain_id,
                    "target chain unknown to wallet, adding definition"
                );
                self.set_state(ConnectState::AddingNetwork);
                provider
                    .add_chain(&self.chain)
                    .await
                    .map_err(|e| EduChainError::NetworkSwitchFailed(e.to_string()))?;

                // Some wallets activate the chain on add; only switch
                // again when this one did not.
                if provider.chain_id().await.ok() == Some(self.chain.chain_id) {
                    return Ok(());
                }
                self.set_state(ConnectState::SwitchingNetwork);
                provider
                    .switch_chain(self.chain.chain_id)
                    .await
                    .map_err(|e| EduChainError::NetworkSwitchFailed(e.to_string()))
            }
            Err(other) => Err(EduChainError::NetworkSwitchFailed(other.to_string())),
        }
    }

    async fn read_chain_id(&self, provider: &dyn WalletProvider) -> Result<u64> {
        provider
            .chain_id()
            .await
            .map_err(|e| EduChainError::NetworkError(e.to_string()))
    }

    fn set_state(&self, next: ConnectState) {
        *self.state.write() = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use ethers::types::Address;

    use crate::provider::ProviderResult;

    /// Scripted provider that counts every wallet call.
    struct ScriptedProvider {
        account: Address,
        active: RwLock<u64>,
        known: RwLock<HashSet<u64>>,
        reject_accounts: bool,
        fail_switch: bool,
        activate_on_add: bool,
        accounts_calls: AtomicUsize,
        chain_id_calls: AtomicUsize,
        switch_calls: AtomicUsize,
        add_calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn on_chain(chain_id: u64) -> Self {
            Self {
                account: Address::repeat_byte(0x42),
                active: RwLock::new(chain_id),
                known: RwLock::new(HashSet::from([chain_id])),
                reject_accounts: false,
                fail_switch: false,
                activate_on_add: false,
                accounts_calls: AtomicUsize::new(0),
                chain_id_calls: AtomicUsize::new(0),
                switch_calls: AtomicUsize::new(0),
                add_calls: AtomicUsize::new(0),
            }
        }

        fn knowing(self, chain_id: u64) -> Self {
            self.known.write().insert(chain_id);
            self
        }
    }

    #[async_trait]
    impl WalletProvider for ScriptedProvider {
        async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
            self.accounts_calls.fetch_add(1, Ordering::SeqCst);
            if self.reject_accounts {
                return Err(ProviderError::UserRejected);
            }
            Ok(vec![self.account])
        }

        async fn chain_id(&self) -> ProviderResult<u64> {
            self.chain_id_calls.fetch_add(1, Ordering::SeqCst);
            Ok(*self.active.read())
        }

        async fn switch_chain(&self, chain_id: u64) -> ProviderResult<()> {
            self.switch_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_switch {
                return Err(ProviderError::Rpc("switch refused".into()));
            }
            if !self.known.read().contains(&chain_id) {
                return Err(ProviderError::UnrecognizedChain);
            }
            *self.active.write() = chain_id;
            Ok(())
        }

        async fn add_chain(&self, config: &ChainConfig) -> ProviderResult<()> {
            self.add_calls.fetch_add(1, Ordering::SeqCst);
            self.known.write().insert(config.chain_id);
            if self.activate_on_add {
                *self.active.write() = config.chain_id;
            }
            Ok(())
        }
    }

    fn target() -> ChainConfig {
        ChainConfig::open_campus_codex()
    }

    fn connector(provider: ScriptedProvider) -> (WalletConnector, Arc<ScriptedProvider>) {
        let provider = Arc::new(provider);
        (
            WalletConnector::new(target(), provider.clone()),
            provider,
        )
    }

    #[tokio::test]
    async fn test_connect_on_target_chain() {
        let (connector, provider) = connector(ScriptedProvider::on_chain(656476));

        let session = connector.connect().await.unwrap();
        assert!(session.connected_to_target_chain);
        assert_eq!(session.account, Address::repeat_byte(0x42));
        assert_eq!(connector.state(), ConnectState::Connected);
        assert_eq!(provider.switch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_connect_switches_known_chain_once() {
        let (connector, provider) =
            connector(ScriptedProvider::on_chain(1).knowing(656476));

        let session = connector.connect().await.unwrap();
        assert!(session.connected_to_target_chain);
        assert_eq!(provider.switch_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.add_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_connect_adds_unknown_chain_then_switches() {
        let (connector, provider) = connector(ScriptedProvider::on_chain(1));

        let session = connector.connect().await.unwrap();
        assert!(session.connected_to_target_chain);
        assert_eq!(provider.add_calls.load(Ordering::SeqCst), 1);
        // Initial switch rejected with 4902, second one succeeds
        assert_eq!(provider.switch_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_connect_add_that_activates_skips_second_switch() {
        let mut provider = ScriptedProvider::on_chain(1);
        provider.activate_on_add = true;
        let (connector, provider) = connector(provider);

        connector.connect().await.unwrap();
        assert_eq!(provider.add_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.switch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_user_rejection_surfaces() {
        let mut provider = ScriptedProvider::on_chain(656476);
        provider.reject_accounts = true;
        let (connector, _) = connector(provider);

        let err = connector.connect().await.unwrap_err();
        assert!(matches!(err, EduChainError::UserRejected(_)));
        assert!(connector.session().is_none());
    }

    #[tokio::test]
    async fn test_switch_failure_is_fatal() {
        let mut provider = ScriptedProvider::on_chain(1).knowing(656476);
        provider.fail_switch = true;
        let (connector, provider) = connector(provider);

        let err = connector.connect().await.unwrap_err();
        assert!(matches!(err, EduChainError::NetworkSwitchFailed(_)));
        assert_eq!(provider.add_calls.load(Ordering::SeqCst), 0);
        assert_eq!(connector.state(), ConnectState::Disconnected);
    }

    #[tokio::test]
    async fn test_missing_provider() {
        let connector = WalletConnector::without_provider(target());
        let err = connector.connect().await.unwrap_err();
        assert!(matches!(err, EduChainError::ProviderUnavailable));
    }

    #[tokio::test]
    async fn test_reconnect_is_idempotent() {
        let (connector, provider) = connector(ScriptedProvider::on_chain(656476));

        connector.connect().await.unwrap();
        let chain_checks = provider.chain_id_calls.load(Ordering::SeqCst);
        connector.connect().await.unwrap();

        // One account prompt total, but the network was re-validated
        assert_eq!(provider.accounts_calls.load(Ordering::SeqCst), 1);
        assert!(provider.chain_id_calls.load(Ordering::SeqCst) > chain_checks);
        assert!(connector.is_connected());
    }

    #[tokio::test]
    async fn test_disconnect_requires_new_authorization() {
        let (connector, provider) = connector(ScriptedProvider::on_chain(656476));

        connector.connect().await.unwrap();
        connector.disconnect();
        assert!(!connector.is_connected());
        assert_eq!(connector.state(), ConnectState::Disconnected);

        connector.connect().await.unwrap();
        assert_eq!(provider.accounts_calls.load(Ordering::SeqCst), 2);
    }
}
