//! Photo session storage integration using Dynamo DB
//!
//! A photo session is a password-protected collection of photo references
//! tied to one event, with a recipient-selected subset.

mod error;

use std::sync::Arc;

use aws_sdk_dynamodb::{error::SdkError, types::AttributeValue, Client as DynamoDbClient};
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub use error::{SessionStorageError, SessionStorageResult};
use strum::Display;

/// Attribute names for the photo session table
#[derive(Debug, Clone, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PhotoSessionAttribute {
    /// Session id (Primary Key)
    SessionId,
    /// Event the photos belong to
    EventId,
    /// Bcrypt hash of the share password
    PasswordHash,
    /// Full photo reference list, fixed at creation
    PhotoUrls,
    /// Recipient-selected subset of `photo_urls`
    SelectedPhotos,
    /// Created At
    CreatedAt,
    /// Updated At
    UpdatedAt,
    /// TTL timestamp
    Ttl,
}

/// Photo session data structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhotoSession {
    /// Session id (Primary Key)
    pub session_id: String,
    /// Event the photos belong to
    pub event_id: String,
    /// Bcrypt hash of the share password
    pub password_hash: String,
    /// Full photo reference list, fixed at creation
    pub photo_urls: Vec<String>,
    /// Recipient-selected subset of `photo_urls`
    pub selected_photos: Vec<String>,
    /// Created At
    pub created_at: i64,
    /// Updated At
    pub updated_at: i64,
    /// TTL timestamp
    pub ttl: i64,
}

impl PhotoSession {
    /// Whether the session is past its TTL at the given unix timestamp.
    ///
    /// DynamoDB TTL deletion is eventual, so reads must check this
    /// themselves; an expired session is treated as not found.
    #[must_use]
    pub const fn is_expired_at(&self, now: i64) -> bool {
        now >= self.ttl
    }
}

/// Photo session storage client for Dynamo DB operations
pub struct SessionStorage {
    dynamodb_client: Arc<DynamoDbClient>,
    table_name: String,
}

impl SessionStorage {
    /// Creates a new photo session storage client
    ///
    /// # Arguments
    ///
    /// * `dynamodb_client` - Pre-configured Dynamo DB client
    /// * `table_name` - Dynamo DB table name for photo sessions
    #[must_use]
    pub const fn new(dynamodb_client: Arc<DynamoDbClient>, table_name: String) -> Self {
        Self {
            dynamodb_client,
            table_name,
        }
    }

    /// Inserts a new photo session
    ///
    /// The insert is conditional on the session id not existing yet, so a
    /// colliding id surfaces as `SessionExists` instead of silently
    /// overwriting another session.
    ///
    /// # Errors
    ///
    /// Returns `SessionStorageError` if the Dynamo DB operation fails
    pub async fn insert(&self, session: &PhotoSession) -> SessionStorageResult<()> {
        let item = serde_dynamo::to_item(session)
            .map_err(|e| SessionStorageError::SerializationError(e.to_string()))?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#pk)")
            .expression_attribute_names("#pk", PhotoSessionAttribute::SessionId.to_string())
            .send()
            .await
            .map_err(|err| {
                if matches!(
                    err,
                    SdkError::ServiceError(ref svc) if svc.err().is_conditional_check_failed_exception()
                ) {
                    SessionStorageError::SessionExists
                } else {
                    err.into()
                }
            })?;

        Ok(())
    }

    /// Gets a photo session by its id
    ///
    /// Returns `None` if no item exists. Expiry is not checked here; callers
    /// decide how to treat sessions past their TTL.
    ///
    /// # Errors
    ///
    /// Returns `SessionStorageError` if the Dynamo DB operation fails
    pub async fn get_by_id(&self, session_id: &str) -> SessionStorageResult<Option<PhotoSession>> {
        let response = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .key(
                PhotoSessionAttribute::SessionId.to_string(),
                AttributeValue::S(session_id.to_string()),
            )
            .send()
            .await?;

        let item = response
            .item()
            .map(|item| serde_dynamo::from_item(item.clone()))
            .transpose()
            .map_err(|e| SessionStorageError::SerializationError(e.to_string()))?;

        Ok(item)
    }

    /// Overwrites the selected photo subset for a given session id
    ///
    /// Uses an attribute-level update expression and bumps `updated_at`.
    /// Last write wins when updates race; membership of the new selection in
    /// the session's photo list is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns `SessionStorageError` if the Dynamo DB operation fails
    pub async fn update_selected_photos(
        &self,
        session_id: &str,
        selected_photos: &[String],
    ) -> SessionStorageResult<()> {
        let selection = AttributeValue::L(
            selected_photos
                .iter()
                .map(|photo| AttributeValue::S(photo.clone()))
                .collect(),
        );

        self.dynamodb_client
            .update_item()
            .table_name(&self.table_name)
            .key(
                PhotoSessionAttribute::SessionId.to_string(),
                AttributeValue::S(session_id.to_string()),
            )
            .update_expression("SET #selected_photos = :selected_photos, #updated_at = :updated_at")
            .expression_attribute_names(
                "#selected_photos",
                PhotoSessionAttribute::SelectedPhotos.to_string(),
            )
            .expression_attribute_values(":selected_photos", selection)
            .expression_attribute_names("#updated_at", PhotoSessionAttribute::UpdatedAt.to_string())
            .expression_attribute_values(
                ":updated_at",
                AttributeValue::N(Utc::now().timestamp().to_string()),
            )
            .send()
            .await?;

        Ok(())
    }

    /// Deletes a photo session by its id
    ///
    /// # Errors
    ///
    /// Returns `SessionStorageError` if the Dynamo DB operation fails
    pub async fn delete(&self, session_id: &str) -> SessionStorageResult<()> {
        self.dynamodb_client
            .delete_item()
            .table_name(&self.table_name)
            .key(
                PhotoSessionAttribute::SessionId.to_string(),
                AttributeValue::S(session_id.to_string()),
            )
            .send()
            .await?;

        Ok(())
    }
}
