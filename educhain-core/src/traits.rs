//! Common traits for EduChain.
//!
//! These traits sit at the seams between the orchestrators and the
//! network-facing clients, enabling modularity and testing against
//! in-memory fakes.

use async_trait::async_trait;
use ethers::types::{Address, TxHash};

use crate::error::Result;
use crate::types::{DocumentRecord, UploadRequest};

// ═══════════════════════════════════════════════════════════════════════════════
// PIN SERVICE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface to an IPFS pinning collaborator.
///
/// Given bytes and metadata it returns a content identifier; everything
/// else about the service is out of scope for the orchestrators.
#[async_trait]
pub trait PinService: Send + Sync {
    /// Verifies credentials against the service, to fail fast before an
    /// upload is attempted.
    async fn test_authentication(&self) -> Result<()>;

    /// Pins the request's file and returns the bare CID.
    ///
    /// The service receives the uploader address, the upload time, and
    /// any user-supplied identifier as pin metadata.
    async fn pin_file(&self, request: &UploadRequest, uploader: Address) -> Result<String>;

    /// Presentation-time gateway URL for a pinned CID.
    fn gateway_url(&self, cid: &str) -> String;
}

// ═══════════════════════════════════════════════════════════════════════════════
// DOCUMENT STORE TRAITS
// ═══════════════════════════════════════════════════════════════════════════════

/// Read side of the document registry.
///
/// Does not require a wallet session; a default read-only provider
/// suffices.
#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// Fetches the record stored for `owner`.
    ///
    /// Returns [`crate::EduChainError::NotFound`] when the contract holds
    /// no record for the address.
    async fn document_for(&self, owner: Address) -> Result<DocumentRecord>;
}

/// Write side of the document registry.
///
/// Implementations are bound to a connected wallet session; the
/// transaction is signed by the session account and the call suspends
/// until it is mined.
#[async_trait]
pub trait DocumentWriter: Send + Sync {
    /// Stores `(cid, metadata_json)` under the session account,
    /// overwriting any prior record. Returns the transaction hash.
    async fn record_document(&self, cid: &str, metadata_json: &str) -> Result<TxHash>;
}
