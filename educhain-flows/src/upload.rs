//! Upload orchestration.
//!
//! Sequence: validate file → fail-fast credential probe → pin to IPFS →
//! record the bare CID in the registry under the session account. A pin
//! that succeeds before a failed write leaves an orphaned pinned file
//! with no on-chain reference; that is accepted and logged, not
//! remediated.

use chrono::Utc;
use tracing::{info, instrument, warn};

use educhain_core::{
    ChainConfig, DocumentWriter, EduChainError, PinService, Result, UploadReceipt, UploadRequest,
    WalletSession,
};

/// Runs the full upload sequence for one request.
///
/// `metadata_json` is stored verbatim when supplied; otherwise a default
/// object carrying the label, uploader address, and upload time is
/// synthesized. The session must be connected to the target chain.
#[instrument(skip_all, fields(request_id = %request.id, file = %request.file_name))]
pub async fn upload(
    session: &WalletSession,
    pin_service: &dyn PinService,
    writer: &dyn DocumentWriter,
    chain: &ChainConfig,
    request: UploadRequest,
    metadata_json: Option<String>,
) -> Result<UploadReceipt> {
    if !session.is_active() {
        return Err(EduChainError::NetworkSwitchFailed(
            "wallet session is not on the target chain".into(),
        ));
    }

    request.validate()?;

    pin_service.test_authentication().await?;

    let cid = pin_service.pin_file(&request, session.account).await?;
    info!(cid = %cid, "document pinned");

    let metadata = match metadata_json {
        Some(json) => json,
        None => default_metadata(&request, session),
    };

    let tx_hash = writer
        .record_document(&cid, &metadata)
        .await
        .inspect_err(|e| {
            warn!(cid = %cid, error = %e, "registry write failed after pin; pinned file is orphaned");
        })?;

    let explorer_url = chain.explorer_tx_url(format!("{tx_hash:#x}"));
    info!(tx = %format!("{tx_hash:#x}"), "upload recorded on-chain");

    Ok(UploadReceipt {
        cid,
        tx_hash,
        explorer_url,
    })
}

fn default_metadata(request: &UploadRequest, session: &WalletSession) -> String {
    serde_json::json!({
        "label": request.label,
        "uploader": format!("{:#x}", session.account),
        "uploadedAt": Utc::now().to_rfc3339(),
    })
    .to_string()
}
