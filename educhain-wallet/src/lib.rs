//! # EduChain Wallet
//!
//! Wallet provider abstraction and the connect-and-reconcile state machine.
//!
//! The [`WalletProvider`] trait mirrors the injected-wallet JSON-RPC
//! surface (`eth_requestAccounts`, `eth_chainId`,
//! `wallet_switchEthereumChain`, `wallet_addEthereumChain`).
//! [`WalletConnector`] drives it through
//! `Disconnected → RequestingAccounts → CheckingNetwork →
//! SwitchingNetwork? → AddingNetwork? → Connected`, yielding a
//! [`educhain_core::WalletSession`] bound to the target chain.
//!
//! [`LocalWalletProvider`] is the headless implementation backed by a
//! private-key signer; registry writes go through the
//! [`SessionSigner`] it produces, never through a read-only provider.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, clippy::all)]

pub mod connector;
pub mod provider;

pub use connector::{ConnectState, WalletConnector};
pub use provider::{
    ApprovalHook, LocalWalletProvider, ProviderError, ProviderResult, SessionSigner,
    WalletProvider,
};
