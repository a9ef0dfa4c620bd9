//! Typed registry client.
//!
//! One client generic over the middleware: reads need nothing beyond a
//! read-only provider, writes are only implemented for the session
//! signer. Contract failures are mapped into the workspace error
//! taxonomy at this boundary.

use std::sync::Arc;

use async_trait::async_trait;
use ethers::contract::ContractError;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::LocalWallet;
use ethers::types::{Address, TxHash, U64};
use tracing::{debug, info, instrument};

use educhain_core::{
    ChainConfig, DocumentReader, DocumentRecord, DocumentWriter, EduChainError, Result,
};

use crate::contract::{DocumentRegistry, DocumentUpdatedFilter};

/// Signer-backed client used for registry writes.
pub type SessionRegistry = RegistryClient<SignerMiddleware<Provider<Http>, LocalWallet>>;

/// Client for the deployed `DocumentRegistry` contract.
#[derive(Debug)]
pub struct RegistryClient<M> {
    contract: DocumentRegistry<M>,
    chain: ChainConfig,
}

impl RegistryClient<Provider<Http>> {
    /// Read-only client over the chain's default RPC endpoint.
    ///
    /// Sufficient for `getDocument`; no wallet session required.
    pub fn read_only(contract_address: Address, chain: ChainConfig) -> Result<Self> {
        let provider = Provider::<Http>::try_from(chain.rpc_url.as_str())
            .map_err(|e| EduChainError::ConfigError(format!("bad RPC URL: {e}")))?;
        Ok(Self::new(Arc::new(provider), contract_address, chain))
    }
}

impl SessionRegistry {
    /// Client bound to a session signer; this is the only construction
    /// that can perform writes.
    pub fn with_signer(
        signer: Arc<SignerMiddleware<Provider<Http>, LocalWallet>>,
        contract_address: Address,
        chain: ChainConfig,
    ) -> Self {
        Self::new(signer, contract_address, chain)
    }
}

impl<M: Middleware + 'static> RegistryClient<M> {
    /// Wraps an existing middleware.
    pub fn new(client: Arc<M>, contract_address: Address, chain: ChainConfig) -> Self {
        Self {
            contract: DocumentRegistry::new(contract_address, client),
            chain,
        }
    }

    /// The contract address this client talks to.
    pub fn contract_address(&self) -> Address {
        self.contract.address()
    }

    /// The chain descriptor the client was configured with.
    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// Reads the document record stored for `owner`.
    ///
    /// An empty `ipfsUrl` in the returned tuple maps to `NotFound`.
    #[instrument(skip(self), fields(owner = %format!("{owner:#x}")))]
    pub async fn read(&self, owner: Address) -> Result<DocumentRecord> {
        let (ipfs_url, timestamp, metadata) = self
            .contract
            .get_document(owner)
            .call()
            .await
            .map_err(map_contract_error)?;

        debug!(stored = %ipfs_url, "getDocument returned");
        DocumentRecord::from_chain(owner, ipfs_url, timestamp, metadata)
    }

    /// Parses `input` as an address and reads its record.
    ///
    /// Syntax validation happens before any network call.
    pub async fn read_str(&self, input: &str) -> Result<DocumentRecord> {
        let owner = educhain_core::parse_address(input)?;
        self.read(owner).await
    }

    /// Event builder over `DocumentUpdated`, for callers that want to
    /// observe confirmations. The core flows never depend on this.
    pub fn updates(
        &self,
    ) -> ethers::contract::builders::Event<Arc<M>, M, DocumentUpdatedFilter> {
        self.contract.document_updated_filter()
    }
}

impl SessionRegistry {
    /// Submits `updateDocument(cid, metadata)` signed by the session
    /// account and suspends until the transaction is mined.
    #[instrument(skip(self, metadata_json))]
    pub async fn write(&self, cid: &str, metadata_json: &str) -> Result<TxHash> {
        if cid.trim().is_empty() {
            return Err(EduChainError::ValidationError(
                "cannot record an empty content identifier".into(),
            ));
        }

        let call = self
            .contract
            .update_document(cid.to_string(), metadata_json.to_string());

        let pending = call.send().await.map_err(map_contract_error)?;
        let tx_hash: TxHash = *pending;
        debug!(tx = %format!("{tx_hash:#x}"), "updateDocument submitted");

        let receipt = pending
            .await
            .map_err(|e| EduChainError::NetworkError(e.to_string()))?
            .ok_or_else(|| {
                EduChainError::NetworkError("transaction dropped from the mempool".into())
            })?;

        if receipt.status == Some(U64::zero()) {
            return Err(EduChainError::ChainCallReverted(format!(
                "transaction {:#x} reverted",
                receipt.transaction_hash
            )));
        }

        info!(
            tx = %format!("{:#x}", receipt.transaction_hash),
            block = receipt.block_number.map(|b| b.as_u64()),
            "document recorded"
        );
        Ok(receipt.transaction_hash)
    }
}

#[async_trait]
impl<M: Middleware + 'static> DocumentReader for RegistryClient<M> {
    async fn document_for(&self, owner: Address) -> Result<DocumentRecord> {
        self.read(owner).await
    }
}

#[async_trait]
impl DocumentWriter for SessionRegistry {
    async fn record_document(&self, cid: &str, metadata_json: &str) -> Result<TxHash> {
        self.write(cid, metadata_json).await
    }
}

/// Maps an ethers contract failure into the workspace taxonomy.
///
/// Reverts are distinguished from signer rejection and from plain
/// transport failures; the revert reason string is decoded when the
/// contract supplied one.
fn map_contract_error<M: Middleware>(err: ContractError<M>) -> EduChainError {
    if let Some(raw) = err.as_revert() {
        let reason = err
            .decode_revert::<String>()
            .unwrap_or_else(|| format!("0x{}", hex::encode(raw)));
        return EduChainError::ChainCallReverted(reason);
    }

    let message = err.to_string();
    if message.contains("rejected") || message.contains("denied") {
        return EduChainError::UserRejected(message);
    }
    EduChainError::NetworkError(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> ChainConfig {
        ChainConfig::open_campus_codex()
    }

    fn contract_address() -> Address {
        educhain_core::DEFAULT_REGISTRY_ADDRESS.parse().unwrap()
    }

    #[test]
    fn test_read_only_client_construction() {
        let client = RegistryClient::read_only(contract_address(), chain()).unwrap();
        assert_eq!(client.contract_address(), contract_address());
        assert_eq!(client.chain().chain_id, 656476);
    }

    #[test]
    fn test_read_only_rejects_bad_rpc_url() {
        let mut bad = chain();
        bad.rpc_url = "not a url".into();
        let err = RegistryClient::read_only(contract_address(), bad).unwrap_err();
        assert!(matches!(err, EduChainError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_read_str_rejects_invalid_address_without_network() {
        // Endpoint that would fail if contacted; the parse error must win
        let mut unreachable = chain();
        unreachable.rpc_url = "http://127.0.0.1:1".into();
        let client = RegistryClient::read_only(contract_address(), unreachable).unwrap();

        let err = client.read_str("not-an-address").await.unwrap_err();
        assert!(matches!(err, EduChainError::InvalidAddress(_)));
    }

    #[tokio::test]
    async fn test_empty_cid_rejected_before_submission() {
        let signer = test_signer();
        let client = SessionRegistry::with_signer(signer, contract_address(), chain());

        let err = client.write("  ", "{}").await.unwrap_err();
        assert!(matches!(err, EduChainError::ValidationError(_)));
    }

    fn test_signer() -> Arc<SignerMiddleware<Provider<Http>, LocalWallet>> {
        use ethers::signers::Signer;

        let provider = Provider::<Http>::try_from("http://127.0.0.1:1").unwrap();
        let wallet: LocalWallet =
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
                .parse::<LocalWallet>()
                .unwrap()
                .with_chain_id(656476u64);
        Arc::new(SignerMiddleware::new(provider, wallet))
    }
}
