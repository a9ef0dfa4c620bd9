//! # EduChain IPFS
//!
//! Pinata pin-service client: uploads a document as multipart form data
//! with pin metadata and returns the bare CID. A separate credential
//! probe (`testAuthentication`) lets flows fail fast before touching the
//! upload endpoint.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, clippy::all)]

pub mod pinata;

pub use pinata::{PinataClient, PinataConfig};
