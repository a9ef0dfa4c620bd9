//! Pinata client implementation.
//!
//! Uses the pinning API (`/pinning/pinFileToIPFS`) with JWT Bearer auth.
//! The stored pointer is always the bare CID; gateway URLs are built
//! only for presentation.

use async_trait::async_trait;
use chrono::Utc;
use ethers::types::Address;
use serde::Deserialize;
use tracing::{debug, instrument};

use educhain_core::constants::{DEFAULT_IPFS_GATEWAY_URL, PINATA_API_URL};
use educhain_core::{EduChainError, PinService, Result, UploadRequest};

/// Pin-service client configuration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PinataConfig {
    /// Pinata REST API base URL
    pub api_url: String,
    /// Gateway base used to derive preview links
    pub gateway_url: String,
    /// JWT bearer credential
    pub jwt: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl PinataConfig {
    /// Creates a config with the given JWT and production defaults.
    pub fn new(jwt: impl Into<String>) -> Self {
        Self {
            api_url: PINATA_API_URL.into(),
            gateway_url: DEFAULT_IPFS_GATEWAY_URL.into(),
            jwt: jwt.into(),
            timeout_seconds: 60,
        }
    }

    /// Overrides the API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Overrides the gateway base URL.
    pub fn with_gateway(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = url.into();
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Pinata pin-service client.
pub struct PinataClient {
    config: PinataConfig,
    http_client: reqwest::Client,
}

impl PinataClient {
    /// Creates a client with the given config.
    pub fn with_config(config: PinataConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl PinService for PinataClient {
    /// Probes `/data/testAuthentication` with the configured JWT.
    #[instrument(skip(self))]
    async fn test_authentication(&self) -> Result<()> {
        let response = self
            .http_client
            .get(self.endpoint("/data/testAuthentication"))
            .bearer_auth(&self.config.jwt)
            .send()
            .await
            .map_err(|e| EduChainError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            let text = response.text().await.unwrap_or_default();
            return Err(EduChainError::PinServiceAuthError(format!(
                "{status}: {text}"
            )));
        }
        if !status.is_success() {
            return Err(EduChainError::NetworkError(format!(
                "auth probe failed with status {status}"
            )));
        }

        debug!("pin service credentials accepted");
        Ok(())
    }

    /// Pins the request's file via `/pinning/pinFileToIPFS`.
    ///
    /// Pin metadata carries the uploader address, the upload time, the
    /// request id, and any user-supplied label.
    #[instrument(skip(self, request), fields(request_id = %request.id, file = %request.file_name))]
    async fn pin_file(&self, request: &UploadRequest, uploader: Address) -> Result<String> {
        let file_part = reqwest::multipart::Part::bytes(request.bytes.clone())
            .file_name(request.file_name.clone())
            .mime_str(&request.mime_type)
            .map_err(|e| EduChainError::PinServiceUploadError(e.to_string()))?;

        let mut keyvalues = serde_json::json!({
            "uploader": format!("{uploader:#x}"),
            "uploadedAt": Utc::now().to_rfc3339(),
            "requestId": request.id.to_string(),
        });
        if let Some(label) = &request.label {
            keyvalues["label"] = serde_json::Value::String(label.clone());
        }
        let metadata = serde_json::json!({
            "name": request.file_name,
            "keyvalues": keyvalues,
        });

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("pinataMetadata", metadata.to_string());

        let response = self
            .http_client
            .post(self.endpoint("/pinning/pinFileToIPFS"))
            .bearer_auth(&self.config.jwt)
            .multipart(form)
            .send()
            .await
            .map_err(|e| EduChainError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            let text = response.text().await.unwrap_or_default();
            return Err(EduChainError::PinServiceAuthError(format!(
                "{status}: {text}"
            )));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(EduChainError::PinServiceUploadError(format!(
                "upload failed with status {status}: {text}"
            )));
        }

        let json: PinFileResponse = response
            .json()
            .await
            .map_err(|e| EduChainError::PinServiceUploadError(e.to_string()))?;

        if json.ipfs_hash.trim().is_empty() {
            return Err(EduChainError::PinServiceUploadError(
                "service returned an empty content identifier".into(),
            ));
        }

        debug!(cid = %json.ipfs_hash, "document pinned");
        Ok(json.ipfs_hash)
    }

    fn gateway_url(&self, cid: &str) -> String {
        format!("{}/{}", self.config.gateway_url.trim_end_matches('/'), cid)
    }
}

#[derive(Debug, Deserialize)]
struct PinFileResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}
