//! Chain parameters and validation limits for EduChain.
//!
//! The chain constants describe the Open Campus Codex network the registry
//! contract is deployed on. The wallet connector refuses to operate a
//! session against any other chain id.

// ═══════════════════════════════════════════════════════════════════════════════
// OPEN CAMPUS CODEX NETWORK
// ═══════════════════════════════════════════════════════════════════════════════

/// Numeric chain id of Open Campus Codex.
pub const OPEN_CAMPUS_CHAIN_ID: u64 = 656476;

/// Human-readable network name, as registered with wallets.
pub const OPEN_CAMPUS_CHAIN_NAME: &str = "Open Campus Codex";

/// Default JSON-RPC endpoint for the network.
pub const OPEN_CAMPUS_RPC_URL: &str = "https://rpc.open-campus-codex.gelato.digital";

/// Block explorer base URL (Blockscout).
pub const OPEN_CAMPUS_EXPLORER_URL: &str = "https://opencampus-codex.blockscout.com";

/// Native currency name and ticker symbol.
pub const NATIVE_CURRENCY_NAME: &str = "EDU";

/// Native currency symbol.
pub const NATIVE_CURRENCY_SYMBOL: &str = "EDU";

/// Native currency decimals.
pub const NATIVE_CURRENCY_DECIMALS: u8 = 18;

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY CONTRACT
// ═══════════════════════════════════════════════════════════════════════════════

/// Address of the deployed `DocumentRegistry` contract.
///
/// Overridable via `DOCUMENT_REGISTRY_ADDRESS` in the environment.
pub const DEFAULT_REGISTRY_ADDRESS: &str = "0x1f57908c893021256d1633106b5351348f45deaa";

// ═══════════════════════════════════════════════════════════════════════════════
// UPLOAD VALIDATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum accepted document size in bytes (10 MiB).
pub const MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024;

/// The only accepted document content type.
pub const PDF_MIME_TYPE: &str = "application/pdf";

// ═══════════════════════════════════════════════════════════════════════════════
// IPFS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default public gateway used to build preview links from bare CIDs.
pub const DEFAULT_IPFS_GATEWAY_URL: &str = "https://ipfs.io/ipfs";

/// Pinata REST API base URL.
pub const PINATA_API_URL: &str = "https://api.pinata.cloud";

// ═══════════════════════════════════════════════════════════════════════════════
// WALLET PROVIDER ERROR CODES (EIP-1193 / EIP-3085)
// ═══════════════════════════════════════════════════════════════════════════════

/// Provider error code: the user rejected the request.
pub const WALLET_ERROR_USER_REJECTED: i64 = 4001;

/// Provider error code: the requested chain has not been added to the wallet.
pub const WALLET_ERROR_UNRECOGNIZED_CHAIN: i64 = 4902;
