//! S3-based upload broker
//!
//! Generates time-limited presigned PUT URLs so clients upload photos
//! directly to the bucket. Keys are namespaced by event and upload batch:
//! `{event_id}/{batch_id}/{index}.jpg`.

mod error;

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::{presigning::PresigningConfig, Client as S3Client};
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use error::{BucketError, BucketResult};

/// Maximum number of upload slots per batch
pub const MAX_UPLOAD_SLOTS: usize = 500;

/// Content type for all presigned photo uploads
const UPLOAD_CONTENT_TYPE: &str = "image/jpeg";

/// A single presigned write target within an upload batch
#[derive(Debug, Clone)]
pub struct UploadTarget {
    /// Object key the URL writes to
    pub key: String,
    /// Presigned URL for PUT operations
    pub url: String,
}

/// A batch of presigned write targets for one event
#[derive(Debug, Clone)]
pub struct UploadBatch {
    /// Random id namespacing this batch's keys
    pub batch_id: String,
    /// One target per requested upload slot
    pub targets: Vec<UploadTarget>,
    /// When the presigned URLs expire
    pub expires_at: DateTime<Utc>,
}

/// Upload broker for S3 presigned URL operations
pub struct MediaStorage {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    presigned_url_expiry_secs: u64,
}

impl MediaStorage {
    /// Creates a new upload broker
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - S3 bucket name for photo storage
    /// * `presigned_url_expiry_secs` - Expiry time for presigned URLs in seconds
    #[must_use]
    pub const fn new(
        s3_client: Arc<S3Client>,
        bucket_name: String,
        presigned_url_expiry_secs: u64,
    ) -> Self {
        Self {
            s3_client,
            bucket_name,
            presigned_url_expiry_secs,
        }
    }

    /// Builds the object key for one upload slot
    #[must_use]
    pub fn object_key(event_id: &str, batch_id: &str, index: usize) -> String {
        format!("{event_id}/{batch_id}/{index}.jpg")
    }

    /// Generates a batch of presigned PUT URLs for the given event
    ///
    /// Produces one uniquely-keyed write target per requested slot under a
    /// fresh batch id. Count bounds are validated at the handler boundary.
    ///
    /// # Errors
    ///
    /// Returns `BucketError::ConfigError` if presigning config creation fails
    /// Returns `BucketError::S3Error` if presigned URL generation fails
    pub async fn generate_upload_targets(
        &self,
        event_id: &str,
        count: usize,
    ) -> BucketResult<UploadBatch> {
        let batch_id = Uuid::new_v4().to_string();
        let expiry = Duration::from_secs(self.presigned_url_expiry_secs);

        let presigned_config = PresigningConfig::expires_in(expiry).map_err(|e| {
            BucketError::ConfigError(format!("Failed to create presigning config: {e}"))
        })?;

        let mut targets = Vec::with_capacity(count);
        for index in 0..count {
            let key = Self::object_key(event_id, &batch_id, index);

            let presigned_request = self
                .s3_client
                .put_object()
                .bucket(&self.bucket_name)
                .key(&key)
                .content_type(UPLOAD_CONTENT_TYPE)
                .presigned(presigned_config.clone())
                .await?;

            targets.push(UploadTarget {
                key,
                url: presigned_request.uri().to_string(),
            });
        }

        let expires_at: DateTime<Utc> = Utc::now() + expiry;

        Ok(UploadBatch {
            batch_id,
            targets,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_keys_are_namespaced_by_event_and_batch() {
        let key = MediaStorage::object_key("evt1", "batch-42", 7);
        assert_eq!(key, "evt1/batch-42/7.jpg");
    }

    #[test]
    fn object_keys_within_a_batch_are_distinct() {
        let keys: Vec<String> = (0..3)
            .map(|i| MediaStorage::object_key("evt1", "batch-42", i))
            .collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.iter().all(|k| k.starts_with("evt1/batch-42/")));
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[1], keys[2]);
    }
}
