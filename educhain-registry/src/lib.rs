//! # EduChain Registry
//!
//! Client for the on-chain `DocumentRegistry` contract: a typed wrapper
//! around its two entry points (`updateDocument`, `getDocument`) plus an
//! optional watcher over the `DocumentUpdated` event.
//!
//! Reads work against any middleware (a plain read-only provider is
//! enough); writes are only implemented for a signer client bound to a
//! wallet session. Raw contract tuples are converted to
//! [`educhain_core::DocumentRecord`] immediately at the call boundary.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, clippy::all)]

pub mod client;
pub mod contract;
pub mod memory;

pub use client::{RegistryClient, SessionRegistry};
pub use contract::{DocumentRegistry, DocumentUpdatedFilter};
pub use memory::MemoryStore;
