//! In-memory document store.
//!
//! Implements the reader/writer seams against a plain map, mirroring the
//! contract's overwrite-per-owner semantics. Used by orchestrator tests
//! and suitable for single-process development runs.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use ethers::types::{Address, TxHash, U256};
use ethers::utils::keccak256;
use parking_lot::RwLock;
use tracing::debug;

use educhain_core::{DocumentReader, DocumentRecord, DocumentWriter, EduChainError, Result};

/// In-memory stand-in for the on-chain registry.
///
/// One record per owner, later writes overwrite, and absence maps to
/// `NotFound`, matching the observable behavior of the contract. The write
/// side records under the configured session account, like a signer
/// bound to a session would.
pub struct MemoryStore {
    session_account: Address,
    records: RwLock<HashMap<Address, DocumentRecord>>,
}

impl MemoryStore {
    /// Creates a store whose writes are attributed to `session_account`.
    pub fn new(session_account: Address) -> Self {
        Self {
            session_account,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Seeds a record directly, bypassing the writer path.
    pub fn insert(&self, record: DocumentRecord) {
        self.records.write().insert(record.owner, record);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn unix_now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentReader for MemoryStore {
    async fn document_for(&self, owner: Address) -> Result<DocumentRecord> {
        self.records
            .read()
            .get(&owner)
            .cloned()
            .ok_or_else(|| EduChainError::NotFound(format!("{owner:#x}")))
    }
}

#[async_trait]
impl DocumentWriter for MemoryStore {
    async fn record_document(&self, cid: &str, metadata_json: &str) -> Result<TxHash> {
        if cid.trim().is_empty() {
            return Err(EduChainError::ValidationError(
                "cannot record an empty content identifier".into(),
            ));
        }

        let timestamp = Self::unix_now();
        let record = DocumentRecord::from_chain(
            self.session_account,
            cid.to_string(),
            U256::from(timestamp),
            metadata_json.to_string(),
        )?;
        self.records.write().insert(self.session_account, record);

        // Deterministic pseudo transaction hash for callers that log it
        let tx_hash = TxHash::from(keccak256(
            [cid.as_bytes(), metadata_json.as_bytes(), &timestamp.to_be_bytes()].concat(),
        ));
        debug!(cid, tx = %format!("{tx_hash:#x}"), "record stored in memory");
        Ok(tx_hash)
    }
}
