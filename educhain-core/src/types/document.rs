//! Document records stored in the on-chain registry.
//!
//! The contract keeps one record per owner address and overwrites it on
//! every `updateDocument`; absence is signaled by an empty `ipfsUrl` in
//! the returned tuple. Records are reconstructed into [`DocumentRecord`]
//! immediately at the call boundary so positional tuples never travel
//! further into the application.

use chrono::{DateTime, Utc};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::{EduChainError, Result};

/// A document record read from the registry contract.
///
/// The canonical on-chain representation of the document pointer is the
/// bare IPFS CID; gateway URLs are derived only at presentation time.
/// Legacy records that stored a full gateway URL are normalized on read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Address that wrote the record (primary key in the contract)
    pub owner: Address,
    /// Bare IPFS content identifier of the pinned document
    pub ipfs_cid: String,
    /// Uploader-supplied metadata, stored verbatim as a JSON string
    pub metadata_json: String,
    /// Unix seconds, set by the contract at write time
    pub timestamp: u64,
}

impl DocumentRecord {
    /// Builds a record from the raw `getDocument` tuple.
    ///
    /// An empty `ipfsUrl` means the contract has no record for this
    /// address and maps to [`EduChainError::NotFound`], never to a
    /// zero-valued record.
    pub fn from_chain(
        owner: Address,
        ipfs_url: String,
        timestamp: U256,
        metadata: String,
    ) -> Result<Self> {
        if ipfs_url.trim().is_empty() {
            return Err(EduChainError::NotFound(format!("{owner:#x}")));
        }

        Ok(Self {
            owner,
            ipfs_cid: normalize_cid(&ipfs_url),
            metadata_json: metadata,
            timestamp: timestamp.low_u64(),
        })
    }

    /// Write time as a UTC datetime, if representable.
    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp as i64, 0)
    }
}

/// Extracts the bare CID from a stored pointer value.
///
/// Earlier deployments stored full gateway URLs (`https://.../ipfs/<cid>`)
/// or `ipfs://<cid>` URIs; current writes store the bare CID.
fn normalize_cid(stored: &str) -> String {
    let value = stored.trim();

    if let Some(rest) = value.strip_prefix("ipfs://") {
        return rest.trim_matches('/').to_string();
    }
    if let Some(idx) = value.rfind("/ipfs/") {
        return value[idx + "/ipfs/".len()..].trim_matches('/').to_string();
    }

    value.to_string()
}

/// A record prepared for presentation, with the preview link resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentView {
    /// The underlying on-chain record
    pub record: DocumentRecord,
    /// Gateway URL for viewing the pinned document
    pub preview_url: String,
}

impl DocumentView {
    /// Resolves the preview link against a gateway base URL.
    pub fn new(record: DocumentRecord, gateway_base: &str) -> Self {
        let preview_url = format!(
            "{}/{}",
            gateway_base.trim_end_matches('/'),
            record.ipfs_cid
        );
        Self {
            record,
            preview_url,
        }
    }

    /// Upload date formatted for display.
    pub fn uploaded_at_display(&self) -> String {
        self.record
            .uploaded_at()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "unknown".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CID: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

    fn owner() -> Address {
        "0x1f57908c893021256d1633106b5351348f45deaa"
            .parse()
            .unwrap()
    }

    #[test]
    fn test_from_chain_bare_cid() {
        let record =
            DocumentRecord::from_chain(owner(), CID.into(), U256::from(1700000000u64), "{}".into())
                .unwrap();
        assert_eq!(record.ipfs_cid, CID);
        assert_eq!(record.timestamp, 1700000000);
    }

    #[test]
    fn test_from_chain_empty_url_is_not_found() {
        let err = DocumentRecord::from_chain(owner(), "".into(), U256::zero(), "".into())
            .unwrap_err();
        assert!(matches!(err, EduChainError::NotFound(_)));

        let err = DocumentRecord::from_chain(owner(), "   ".into(), U256::zero(), "".into())
            .unwrap_err();
        assert!(matches!(err, EduChainError::NotFound(_)));
    }

    #[test]
    fn test_normalize_legacy_gateway_url() {
        assert_eq!(
            normalize_cid(&format!("https://ipfs.io/ipfs/{CID}")),
            CID
        );
        assert_eq!(
            normalize_cid(&format!("https://gateway.pinata.cloud/ipfs/{CID}/")),
            CID
        );
    }

    #[test]
    fn test_normalize_ipfs_uri() {
        assert_eq!(normalize_cid(&format!("ipfs://{CID}")), CID);
    }

    #[test]
    fn test_normalize_passes_through_bare_cid() {
        assert_eq!(normalize_cid(CID), CID);
    }

    #[test]
    fn test_view_preview_url() {
        let record =
            DocumentRecord::from_chain(owner(), CID.into(), U256::from(1u64), "{}".into())
                .unwrap();
        let view = DocumentView::new(record, "https://ipfs.io/ipfs/");
        assert_eq!(view.preview_url, format!("https://ipfs.io/ipfs/{CID}"));
    }

    #[test]
    fn test_uploaded_at_display() {
        let record = DocumentRecord::from_chain(
            owner(),
            CID.into(),
            U256::from(1700000000u64),
            "{}".into(),
        )
        .unwrap();
        let view = DocumentView::new(record, "https://ipfs.io/ipfs");
        assert!(view.uploaded_at_display().starts_with("2023-11-14"));
    }
}
