//! # EduChain Flows
//!
//! The two user-facing sequences, written against the core traits so any
//! pin service or document store implementation can sit behind them:
//!
//! - [`upload`]: validate file → pin to IPFS → record in the registry
//! - [`search`]: validate address → read registry → present the record
//!
//! Each flow is a single pass; any stage failure aborts the remaining
//! stages and reaches the caller as one [`educhain_core::EduChainError`]
//! whose `user_message()` is the string shown to the user. Nothing is
//! retried automatically.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, clippy::all)]

pub mod search;
pub mod upload;

pub use search::{search, SearchOutcome};
pub use upload::upload;
