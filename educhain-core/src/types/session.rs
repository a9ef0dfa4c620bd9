//! Wallet session state.

use ethers::types::Address;
use serde::{Deserialize, Serialize};

/// An established wallet session.
///
/// Created by a successful `connect()` and held for the lifetime of the
/// process; never persisted. Registry writes must go through a signer
/// bound to this session, not the read-only provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSession {
    /// The authorized account
    pub account: Address,
    /// Chain id the provider was on when the session was established
    pub chain_id: u64,
    /// Whether the provider's active network matches the target chain
    pub connected_to_target_chain: bool,
}

impl WalletSession {
    /// Creates a session for an account on the given chain.
    pub fn new(account: Address, chain_id: u64, target_chain_id: u64) -> Self {
        Self {
            account,
            chain_id,
            connected_to_target_chain: chain_id == target_chain_id,
        }
    }

    /// True when the session can be used for registry writes.
    pub fn is_active(&self) -> bool {
        self.connected_to_target_chain
    }
}
