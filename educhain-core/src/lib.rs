//! # EduChain Core
//!
//! Core types, errors, and traits for the EduChain document registry.
//!
//! This crate provides the foundational building blocks used by all other
//! EduChain crates:
//!
//! - **Types**: Domain models for the chain descriptor, wallet sessions,
//!   document records, and upload requests
//! - **Errors**: Comprehensive error types with user-facing messages
//! - **Constants**: Chain parameters and validation limits
//! - **Traits**: Interfaces the pin service and registry clients satisfy
//!
//! ## Example
//!
//! ```rust
//! use educhain_core::{ChainConfig, UploadRequest};
//!
//! let chain = ChainConfig::open_campus_codex();
//! assert_eq!(chain.chain_id, 656476);
//!
//! let request = UploadRequest::new("transcript.pdf", "application/pdf", vec![0u8; 64]);
//! assert!(request.validate().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{EduChainError, Result};
pub use traits::*;
pub use types::*;
