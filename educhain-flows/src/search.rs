//! Search orchestration.
//!
//! Sequence: validate the input address → read the registry through a
//! read-capable provider → present the stored record with its preview
//! link. `NotFound` is an outcome here, not an error: an address with no
//! document is a normal answer for a verifier.

use tracing::{debug, instrument};

use educhain_core::{
    parse_address, DocumentReader, DocumentView, EduChainError, Result,
};
use ethers::types::Address;

/// Terminal outcome of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A record exists; the view carries the resolved preview link.
    Found(DocumentView),
    /// The registry holds no document for this address.
    NoDocument {
        /// The queried address
        address: Address,
    },
}

/// Runs the search sequence for one address string.
///
/// Address syntax is validated before any network call; a malformed
/// input fails with `InvalidAddress` without touching the provider.
#[instrument(skip(reader, gateway_base))]
pub async fn search(
    reader: &dyn DocumentReader,
    gateway_base: &str,
    input: &str,
) -> Result<SearchOutcome> {
    let address = parse_address(input)?;

    match reader.document_for(address).await {
        Ok(record) => {
            debug!(cid = %record.ipfs_cid, "record found");
            Ok(SearchOutcome::Found(DocumentView::new(record, gateway_base)))
        }
        Err(EduChainError::NotFound(_)) => Ok(SearchOutcome::NoDocument { address }),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use ethers::types::U256;

    use educhain_core::{DocumentRecord, DocumentWriter};
    use educhain_registry::MemoryStore;

    const CID: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";
    const GATEWAY: &str = "https://ipfs.io/ipfs";

    struct CountingReader {
        inner: MemoryStore,
        calls: AtomicUsize,
    }

    impl CountingReader {
        fn new(inner: MemoryStore) -> Self {
            Self {
                inner,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DocumentReader for CountingReader {
        async fn document_for(&self, owner: Address) -> educhain_core::Result<DocumentRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.document_for(owner).await
        }
    }

    fn account() -> Address {
        Address::repeat_byte(0x42)
    }

    #[tokio::test]
    async fn test_invalid_address_fails_without_reader_call() {
        let reader = CountingReader::new(MemoryStore::new(account()));

        let err = search(&reader, GATEWAY, "not-an-address").await.unwrap_err();

        assert!(matches!(err, EduChainError::InvalidAddress(_)));
        assert_eq!(reader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_address_is_no_document() {
        let reader = CountingReader::new(MemoryStore::new(account()));

        let outcome = search(&reader, GATEWAY, &format!("{:#x}", account()))
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::NoDocument { address: account() });
        assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_found_record_carries_preview_link() {
        let store = MemoryStore::new(account());
        store.insert(
            DocumentRecord::from_chain(
                account(),
                CID.into(),
                U256::from(1700000000u64),
                r#"{"label":"MIT"}"#.into(),
            )
            .unwrap(),
        );

        let outcome = search(&store, GATEWAY, &format!("{:#x}", account()))
            .await
            .unwrap();

        match outcome {
            SearchOutcome::Found(view) => {
                assert_eq!(view.preview_url, format!("{GATEWAY}/{CID}"));
                assert_eq!(view.record.ipfs_cid, CID);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_write_then_search_roundtrip() {
        let store = MemoryStore::new(account());
        store
            .record_document(CID, r#"{"degree":"BSc"}"#)
            .await
            .unwrap();

        let outcome = search(&store, GATEWAY, &format!("{:#x}", account()))
            .await
            .unwrap();

        match outcome {
            SearchOutcome::Found(view) => {
                assert_eq!(view.record.ipfs_cid, CID);
                assert_eq!(view.record.metadata_json, r#"{"degree":"BSc"}"#);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
