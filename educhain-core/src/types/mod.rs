//! Domain types for EduChain.

mod chain;
mod document;
mod session;
mod upload;

pub use chain::{ChainConfig, NativeCurrency};
pub use document::{DocumentRecord, DocumentView};
pub use session::WalletSession;
pub use upload::{UploadReceipt, UploadRequest};

use ethers::types::Address;

use crate::error::{EduChainError, Result};

/// Parses an account address from user input.
///
/// This is pure syntax validation; it performs no network calls and is
/// invoked by the search flow before any provider is touched.
pub fn parse_address(input: &str) -> Result<Address> {
    input
        .trim()
        .parse::<Address>()
        .map_err(|_| EduChainError::InvalidAddress(input.trim().to_string()))
}
