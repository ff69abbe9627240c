use std::sync::Arc;

use aide::OperationIo;
use axum::{
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
    Extension,
};

use crate::{
    jwt::{Claims, JwtManager},
    types::AppError,
};

/// Authenticated session information extracted from the access token
#[derive(Debug, Clone, OperationIo)]
pub struct AuthenticatedSession {
    /// The session id the token is scoped to
    pub session_id: String,
}

impl From<Claims> for AuthenticatedSession {
    fn from(claims: Claims) -> Self {
        Self {
            session_id: claims.sub,
        }
    }
}

/// Axum extractor for the authenticated session
///
/// Use this in handlers behind the auth middleware:
/// ```ignore
/// async fn protected_handler(
///     session: AuthenticatedSession,
///     // ... other extractors
/// ) -> Result<impl IntoResponse, AppError> {
///     // session.session_id is the token's subject
///     Ok("Protected content")
/// }
/// ```
impl<S> FromRequestParts<S> for AuthenticatedSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            AppError::new(
                StatusCode::UNAUTHORIZED,
                "missing_auth",
                "Authentication required but session not found in request extensions",
                false,
            )
        })
    }
}

/// JWT authentication middleware
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates it using `JwtManager` (signature + expiry)
/// 3. Adds `AuthenticatedSession` to request extensions
/// 4. Returns 401 for invalid/missing tokens
///
/// Whether the token's session matches the requested path id is checked in
/// the handlers, where a mismatch maps to 403.
///
/// # Errors
///
/// - `AppError` - Invalid/missing token with 401 status code
pub async fn auth_middleware(
    Extension(jwt_manager): Extension<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::new(
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Authorization header must contain a valid Bearer token",
                false,
            )
        })?;

    let claims = jwt_manager.validate(token).map_err(|_| {
        AppError::new(
            StatusCode::UNAUTHORIZED,
            "invalid_token",
            "Invalid or expired token",
            false,
        )
    })?;

    let session = AuthenticatedSession::from(claims);
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
