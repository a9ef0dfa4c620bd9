//! Upload requests and their terminal outcome.

use ethers::types::TxHash;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_DOCUMENT_SIZE, PDF_MIME_TYPE};
use crate::error::{EduChainError, Result};

/// A transient request to upload one document.
///
/// Exists only for the duration of a single upload attempt; the `id` ties
/// log lines and pin-service metadata to the attempt.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Request identifier for logging and pin metadata
    pub id: Uuid,
    /// Original file name
    pub file_name: String,
    /// Declared content type; must be `application/pdf`
    pub mime_type: String,
    /// Raw file contents
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Optional user-supplied identifier (e.g. institution name)
    pub label: Option<String>,
}

impl UploadRequest {
    /// Creates a request for the given file.
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
            label: None,
        }
    }

    /// Attaches a user-supplied identifier.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// File size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Validates content type and size.
    ///
    /// Fails with [`EduChainError::ValidationError`] naming the specific
    /// reason: wrong content type, or file larger than 10 MiB.
    pub fn validate(&self) -> Result<()> {
        if self.mime_type != PDF_MIME_TYPE {
            return Err(EduChainError::ValidationError(format!(
                "only PDF documents are accepted (got content type '{}')",
                self.mime_type
            )));
        }

        if self.bytes.len() > MAX_DOCUMENT_SIZE {
            return Err(EduChainError::ValidationError(format!(
                "document is {} bytes; the maximum is {} bytes (10 MiB)",
                self.bytes.len(),
                MAX_DOCUMENT_SIZE
            )));
        }

        Ok(())
    }
}

/// Terminal outcome of a successful upload flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// CID of the pinned document
    pub cid: String,
    /// Hash of the mined registry transaction
    pub tx_hash: TxHash,
    /// Explorer link for the transaction
    pub explorer_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn pdf_request(size: usize) -> UploadRequest {
        UploadRequest::new("diploma.pdf", PDF_MIME_TYPE, vec![0u8; size])
    }

    #[test]
    fn test_valid_pdf_passes() {
        assert!(pdf_request(1024).validate().is_ok());
    }

    #[test]
    fn test_exactly_max_size_passes() {
        assert!(pdf_request(MAX_DOCUMENT_SIZE).validate().is_ok());
    }

    #[test]
    fn test_oversize_fails_with_size_reason() {
        let err = pdf_request(MAX_DOCUMENT_SIZE + 1).validate().unwrap_err();
        match err {
            EduChainError::ValidationError(reason) => assert!(reason.contains("10 MiB")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test_case("image/png"; "png")]
    #[test_case("text/plain"; "plain text")]
    #[test_case("application/octet-stream"; "octet stream")]
    #[test_case(""; "empty")]
    fn test_non_pdf_mime_fails(mime: &str) {
        let request = UploadRequest::new("file.bin", mime, vec![0u8; 16]);
        let err = request.validate().unwrap_err();
        match err {
            EduChainError::ValidationError(reason) => assert!(reason.contains("PDF")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_label_builder() {
        let request = pdf_request(8).with_label("MIT");
        assert_eq!(request.label.as_deref(), Some("MIT"));
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(pdf_request(1).id, pdf_request(1).id);
    }
}
