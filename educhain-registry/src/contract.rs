//! Generated bindings for the deployed `DocumentRegistry` contract.

use ethers::contract::abigen;

abigen!(
    DocumentRegistry,
    r"[
        function updateDocument(string ipfsUrl, string metadata) external
        function getDocument(address walletAddress) external view returns (string ipfsUrl, uint256 timestamp, string metadata)
        event DocumentUpdated(address indexed uploader, string ipfsUrl, uint256 timestamp)
    ]"
);
