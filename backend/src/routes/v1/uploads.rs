use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    media_storage::{MediaStorage, MAX_UPLOAD_SLOTS},
    types::AppError,
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateUploadUrlsRequest {
    /// Event the uploads belong to
    pub event_id: String,
    /// Number of upload slots to provision, between 1 and 500
    pub num_photos: usize,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct UploadTargetResponse {
    /// Object key the URL writes to
    pub key: String,
    /// Presigned PUT URL
    pub url: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct GenerateUploadUrlsResponse {
    /// Batch id namespacing the generated keys
    pub batch_id: String,
    /// One write target per requested slot
    pub upload_targets: Vec<UploadTargetResponse>,
    /// ISO-8601 UTC timestamp when the URLs expire
    pub expires_at: String,
}

/// Generates a batch of presigned upload URLs for client-side uploads
///
/// Each target is keyed `{event_id}/{batch_id}/{index}.jpg` and valid for
/// the configured expiry window. Clients PUT photo bytes directly to the
/// bucket; no photo data flows through this service.
///
/// # Errors
///
/// - `AppError` with 400 for an empty event id or a slot count outside `[1, 500]`
/// - `AppError` with 5xx if presigned URL generation fails
#[instrument(skip(media_storage, payload))]
pub async fn generate_upload_urls(
    Extension(media_storage): Extension<Arc<MediaStorage>>,
    Json(payload): Json<GenerateUploadUrlsRequest>,
) -> Result<Json<GenerateUploadUrlsResponse>, AppError> {
    if payload.event_id.trim().is_empty() {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "invalid_event_id",
            "event_id must not be empty",
            false,
        ));
    }

    validate_upload_count(payload.num_photos)?;

    let batch = media_storage
        .generate_upload_targets(&payload.event_id, payload.num_photos)
        .await?;

    tracing::info!(
        batch_id = %batch.batch_id,
        slot_count = batch.targets.len(),
        "Generated presigned upload URLs"
    );

    Ok(Json(GenerateUploadUrlsResponse {
        batch_id: batch.batch_id,
        upload_targets: batch
            .targets
            .into_iter()
            .map(|target| UploadTargetResponse {
                key: target.key,
                url: target.url,
            })
            .collect(),
        expires_at: batch.expires_at.to_rfc3339(),
    }))
}

/// Validates the requested slot count against the `[1, 500]` bounds
fn validate_upload_count(num_photos: usize) -> Result<(), AppError> {
    if !(1..=MAX_UPLOAD_SLOTS).contains(&num_photos) {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "invalid_photo_count",
            "num_photos must be between 1 and 500",
            false,
        ));
    }
    Ok(())
}
