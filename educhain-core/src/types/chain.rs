//! Chain descriptor for the target network.
//!
//! Static configuration only; the wallet connector consumes it when
//! checking, switching, or registering the network with a provider.

use serde::{Deserialize, Serialize};

use crate::constants::{
    NATIVE_CURRENCY_DECIMALS, NATIVE_CURRENCY_NAME, NATIVE_CURRENCY_SYMBOL,
    OPEN_CAMPUS_CHAIN_ID, OPEN_CAMPUS_CHAIN_NAME, OPEN_CAMPUS_EXPLORER_URL, OPEN_CAMPUS_RPC_URL,
};

/// Native currency of a chain, as registered with wallet providers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    /// Currency name (e.g. "EDU")
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Number of decimals of the base unit
    pub decimals: u8,
}

/// Static description of the target network.
///
/// Carries everything a wallet provider needs to add the network when it
/// is unknown (`wallet_addEthereumChain`): chain id, RPC endpoint, native
/// currency, and block explorer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Numeric chain id
    pub chain_id: u64,
    /// Human-readable network name
    pub chain_name: String,
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Native currency definition
    pub native_currency: NativeCurrency,
    /// Block explorer base URL
    pub explorer_url: String,
}

impl ChainConfig {
    /// The Open Campus Codex network the registry contract lives on.
    pub fn open_campus_codex() -> Self {
        Self {
            chain_id: OPEN_CAMPUS_CHAIN_ID,
            chain_name: OPEN_CAMPUS_CHAIN_NAME.into(),
            rpc_url: OPEN_CAMPUS_RPC_URL.into(),
            native_currency: NativeCurrency {
                name: NATIVE_CURRENCY_NAME.into(),
                symbol: NATIVE_CURRENCY_SYMBOL.into(),
                decimals: NATIVE_CURRENCY_DECIMALS,
            },
            explorer_url: OPEN_CAMPUS_EXPLORER_URL.into(),
        }
    }

    /// Chain id in the 0x-prefixed hex form wallets exchange on the wire.
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// Explorer link for a transaction hash.
    pub fn explorer_tx_url(&self, tx_hash: impl std::fmt::Display) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::open_campus_codex()
    }
}
