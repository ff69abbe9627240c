use std::collections::HashSet;
use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, Extension, Json};
use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use session_storage::photo_session::{PhotoSession, SessionStorage};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    jwt::JwtManager,
    middleware::AuthenticatedSession,
    password,
    types::{AppError, Environment},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateSessionRequest {
    /// Event the photos belong to
    pub event_id: String,
    /// Full photo reference list for the session
    pub photo_urls: Vec<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct CreateSessionResponse {
    /// Opaque session id
    pub session_id: String,
    /// Shareable link for recipients
    pub session_link: String,
    /// Generated share password; returned here exactly once
    pub password: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PasswordAuthRequest {
    /// Share password handed out by the organizer
    pub password: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct TokenResponse {
    /// JWT access token scoped to this session
    pub access_token: String,
    /// Always "bearer"
    pub token_type: String,
    /// Expires at Unix timestamp in seconds
    pub expires_at: i64,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct PhotoListResponse {
    /// Full photo reference list
    pub photos: Vec<String>,
    /// Currently selected subset
    pub selected_photos: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SelectionRequest {
    /// Photo references to select; must all be members of the session's list
    pub photos: Vec<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SelectionResponse {
    pub success: bool,
    /// Number of photos stored in the selection
    pub selected_count: usize,
}

/// Creates a new password-protected photo session
///
/// Generates a random session id and share password, hashes the password
/// and persists the record with an empty selection. The plaintext password
/// appears only in this response and is not retrievable afterwards.
///
/// # Errors
///
/// - `AppError` with 400 for an empty event id
/// - `AppError` with 5xx for storage or hashing failures
#[instrument(skip(session_storage, environment, payload))]
pub async fn create_session(
    Extension(session_storage): Extension<Arc<SessionStorage>>,
    Extension(environment): Extension<Environment>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, AppError> {
    if payload.event_id.trim().is_empty() {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "invalid_event_id",
            "event_id must not be empty",
            false,
        ));
    }

    let session_id = Uuid::new_v4().to_string();
    let plaintext_password = password::generate_password();
    let password_hash = password::hash_password(&plaintext_password)?;

    let now = Utc::now().timestamp();
    let session = PhotoSession {
        session_id: session_id.clone(),
        event_id: payload.event_id,
        password_hash,
        photo_urls: payload.photo_urls,
        selected_photos: vec![],
        created_at: now,
        updated_at: now,
        ttl: now + environment.session_ttl_secs(),
    };

    session_storage.insert(&session).await?;

    tracing::info!(
        session_id = %session_id,
        photo_count = session.photo_urls.len(),
        "Created photo session"
    );

    let session_link = format!("{}/session/{session_id}", environment.share_link_base_url());

    Ok(Json(CreateSessionResponse {
        session_id,
        session_link,
        password: plaintext_password,
    }))
}

/// Authenticates a recipient for a session using the share password
///
/// Verifies the password against the stored bcrypt hash and mints a
/// short-lived access token whose only claim is this session's id.
///
/// # Errors
///
/// - `AppError` with 404 if the session is absent or expired
/// - `AppError` with 401 for a wrong password
#[instrument(skip(session_storage, jwt_manager, payload))]
pub async fn authenticate_session(
    Extension(session_storage): Extension<Arc<SessionStorage>>,
    Extension(jwt_manager): Extension<Arc<JwtManager>>,
    Path(session_id): Path<String>,
    Json(payload): Json<PasswordAuthRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let session = fetch_active_session(&session_storage, &session_id).await?;

    let password_matches = password::verify_password(&payload.password, &session.password_hash)?;
    if !password_matches {
        return Err(AppError::new(
            StatusCode::UNAUTHORIZED,
            "invalid_password",
            "Incorrect password",
            false,
        ));
    }

    let issued = jwt_manager.issue_token(&session.session_id)?;

    Ok(Json(TokenResponse {
        access_token: issued.token,
        token_type: "bearer".to_string(),
        expires_at: issued.expires_at,
    }))
}

/// Returns the photo list and current selection for a session
///
/// # Errors
///
/// - `AppError` with 403 if the token is bound to a different session
/// - `AppError` with 404 if the session is absent or expired
#[instrument(skip(session_storage, authenticated))]
pub async fn get_session_photos(
    Extension(session_storage): Extension<Arc<SessionStorage>>,
    authenticated: AuthenticatedSession,
    Path(session_id): Path<String>,
) -> Result<Json<PhotoListResponse>, AppError> {
    if authenticated.session_id != session_id {
        return Err(AppError::session_mismatch());
    }

    let session = fetch_active_session(&session_storage, &session_id).await?;

    Ok(Json(PhotoListResponse {
        photos: session.photo_urls,
        selected_photos: session.selected_photos,
    }))
}

/// Overwrites the selected photo subset for a session
///
/// The new selection must be a subset of the session's photo list; any
/// unknown reference rejects the whole request and leaves the stored
/// selection unchanged. Concurrent updates are last-write-wins.
///
/// # Errors
///
/// - `AppError` with 403 if the token is bound to a different session
/// - `AppError` with 404 if the session is absent or expired
/// - `AppError` with 400 if the selection contains unknown photos
#[instrument(skip(session_storage, authenticated, payload))]
pub async fn select_session_photos(
    Extension(session_storage): Extension<Arc<SessionStorage>>,
    authenticated: AuthenticatedSession,
    Path(session_id): Path<String>,
    Json(payload): Json<SelectionRequest>,
) -> Result<Json<SelectionResponse>, AppError> {
    if authenticated.session_id != session_id {
        return Err(AppError::session_mismatch());
    }

    let session = fetch_active_session(&session_storage, &session_id).await?;

    let selection = validate_selection(payload.photos, &session.photo_urls)?;

    session_storage
        .update_selected_photos(&session_id, &selection)
        .await?;

    tracing::info!(
        session_id = %session_id,
        selected_count = selection.len(),
        "Updated photo selection"
    );

    Ok(Json(SelectionResponse {
        success: true,
        selected_count: selection.len(),
    }))
}

/// Fetches a session, treating absent and expired records alike as not found
async fn fetch_active_session(
    session_storage: &SessionStorage,
    session_id: &str,
) -> Result<PhotoSession, AppError> {
    let session = session_storage
        .get_by_id(session_id)
        .await?
        .ok_or_else(AppError::session_not_found)?;

    if session.is_expired_at(Utc::now().timestamp()) {
        return Err(AppError::session_not_found());
    }

    Ok(session)
}

/// Validates that a requested selection is a subset of the photo list
///
/// Deduplicates the selection while preserving its order.
fn validate_selection(
    requested: Vec<String>,
    photo_urls: &[String],
) -> Result<Vec<String>, AppError> {
    let available: HashSet<&str> = photo_urls.iter().map(String::as_str).collect();

    if requested
        .iter()
        .any(|photo| !available.contains(photo.as_str()))
    {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "unknown_photos",
            "Selection contains photos that are not part of this session",
            false,
        ));
    }

    let mut seen = HashSet::new();
    Ok(requested
        .into_iter()
        .filter(|photo| seen.insert(photo.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn photo_urls() -> Vec<String> {
        vec!["u1".to_string(), "u2".to_string(), "u3".to_string()]
    }

    #[test]
    fn test_validate_selection_accepts_subset() {
        let result = validate_selection(vec!["u1".to_string(), "u3".to_string()], &photo_urls());
        assert_eq!(result.unwrap(), vec!["u1".to_string(), "u3".to_string()]);
    }

    #[test]
    fn test_validate_selection_accepts_empty() {
        let result = validate_selection(vec![], &photo_urls());
        assert_eq!(result.unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_validate_selection_rejects_unknown_photo() {
        let result = validate_selection(vec!["u1".to_string(), "u4".to_string()], &photo_urls());
        let err = result.expect_err("unknown photo should be rejected");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validate_selection_rejects_unknown_even_if_rest_valid() {
        let result = validate_selection(
            vec!["u1".to_string(), "u2".to_string(), "nope".to_string()],
            &photo_urls(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_selection_deduplicates_preserving_order() {
        let result = validate_selection(
            vec![
                "u2".to_string(),
                "u1".to_string(),
                "u2".to_string(),
                "u1".to_string(),
            ],
            &photo_urls(),
        );
        assert_eq!(result.unwrap(), vec!["u2".to_string(), "u1".to_string()]);
    }
}
