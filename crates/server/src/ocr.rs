//! Receipt scanning relay.

use api_types::Envelope;
use axum::{
    Extension, Json,
    extract::{State, multipart::Multipart},
};

use crate::{ServerError, server::ServerState};
use engine::User;

/// Multipart field `receiptImage`; the provider response is returned
/// as-is so clients can pick the fields they care about.
pub async fn receipt(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<Envelope<serde_json::Value>>, ServerError> {
    let ocr = state
        .integrations
        .ocr
        .as_ref()
        .ok_or_else(|| ServerError::Internal("receipt scanning is not configured".to_string()))?;

    let mut receipt = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ServerError::Generic(err.to_string()))?
    {
        if field.name() != Some("receiptImage") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("receipt").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ServerError::Generic(err.to_string()))?;
        receipt = Some((file_name, content_type, bytes.to_vec()));
        break;
    }
    let (file_name, content_type, bytes) = receipt.ok_or_else(|| {
        ServerError::Generic("multipart field \"receiptImage\" is required".to_string())
    })?;

    let scanned = ocr.scan_receipt(&file_name, &content_type, bytes).await?;

    Ok(Json(Envelope::data(scanned)))
}
