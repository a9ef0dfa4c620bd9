//! Error types for EduChain.
//!
//! This module provides the error hierarchy for the whole workspace using
//! `thiserror`. Every error that can reach a user has a single-line
//! user-facing rendering via [`EduChainError::user_message`]; orchestrators
//! catch at their boundary and surface exactly that string.

use thiserror::Error;

/// Result type alias using `EduChainError`.
pub type Result<T> = std::result::Result<T, EduChainError>;

/// Main error type for all EduChain operations.
#[derive(Debug, Error)]
pub enum EduChainError {
    // ═══════════════════════════════════════════════════════════════════════════
    // WALLET ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// No wallet provider capability in the execution environment.
    #[error("no wallet provider available")]
    ProviderUnavailable,

    /// The user declined account authorization or transaction signing.
    #[error("request rejected by user: {0}")]
    UserRejected(String),

    /// Switching the wallet to the target network failed.
    #[error("network switch failed: {0}")]
    NetworkSwitchFailed(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // REGISTRY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input is not a syntactically valid account address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// No document record exists for the queried address.
    #[error("no document found for {0}")]
    NotFound(String),

    /// The contract call reverted.
    #[error("contract call reverted: {0}")]
    ChainCallReverted(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // PIN SERVICE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The pin service rejected our credentials.
    #[error("pin service authentication failed: {0}")]
    PinServiceAuthError(String),

    /// The pin service accepted credentials but the upload failed.
    #[error("pin service upload failed: {0}")]
    PinServiceUploadError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Upload request validation failed (file type or size).
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Configuration error (missing or malformed environment values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // TRANSPORT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// RPC or connectivity failure.
    #[error("network error: {0}")]
    NetworkError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EduChainError {
    /// Returns true if this error is recoverable (re-triggering the same
    /// action may succeed). Nothing is retried automatically.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EduChainError::NetworkError(_)
                | EduChainError::PinServiceUploadError(_)
                | EduChainError::UserRejected(_)
        )
    }

    /// Returns true if this is an input validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            EduChainError::ValidationError(_) | EduChainError::InvalidAddress(_)
        )
    }

    /// Single user-visible message for this error.
    ///
    /// Orchestrators map every failure to exactly one of these strings;
    /// internal detail stays in the log.
    pub fn user_message(&self) -> String {
        match self {
            EduChainError::ProviderUnavailable => {
                "Please install MetaMask or a compatible wallet".into()
            }
            EduChainError::UserRejected(_) => "Request was rejected in the wallet".into(),
            EduChainError::NetworkSwitchFailed(_) => {
                "Could not switch the wallet to Open Campus Codex".into()
            }
            EduChainError::InvalidAddress(input) => {
                format!("'{input}' is not a valid wallet address")
            }
            EduChainError::NotFound(address) => {
                format!("No document is registered for {address}")
            }
            EduChainError::ChainCallReverted(_) => {
                "The registry contract rejected the update".into()
            }
            EduChainError::PinServiceAuthError(_) => {
                "Pin service credentials were rejected; check PINATA_JWT".into()
            }
            EduChainError::PinServiceUploadError(_) => {
                "Uploading the document to IPFS failed".into()
            }
            EduChainError::ValidationError(reason) => reason.clone(),
            EduChainError::ConfigError(reason) => format!("Configuration problem: {reason}"),
            EduChainError::NetworkError(_) => {
                "A network error occurred; please try again".into()
            }
            EduChainError::JsonError(_) => "Malformed metadata".into(),
            EduChainError::IoError(_) => "Could not read the document file".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EduChainError::InvalidAddress("not-an-address".into());
        assert!(err.to_string().contains("not-an-address"));
    }

    #[test]
    fn test_error_classification() {
        assert!(EduChainError::NetworkError("timeout".into()).is_recoverable());
        assert!(!EduChainError::ProviderUnavailable.is_recoverable());

        assert!(EduChainError::ValidationError("too large".into()).is_validation_error());
        assert!(EduChainError::InvalidAddress("xyz".into()).is_validation_error());
        assert!(!EduChainError::NotFound("0xabc".into()).is_validation_error());
    }

    #[test]
    fn test_user_message_is_single_line() {
        let errors = [
            EduChainError::ProviderUnavailable,
            EduChainError::UserRejected("denied".into()),
            EduChainError::NetworkSwitchFailed("code -32002".into()),
            EduChainError::PinServiceAuthError("401".into()),
            EduChainError::NotFound("0xabc".into()),
        ];
        for err in errors {
            let msg = err.user_message();
            assert!(!msg.is_empty());
            assert!(!msg.contains('\n'));
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("invalid");
        let result: Result<serde_json::Value> = json_result.map_err(EduChainError::from);
        assert!(matches!(result, Err(EduChainError::JsonError(_))));
    }
}
