//! Access token management (HS256)
//!
//! Tokens are stateless: the only claim that matters is `sub`, the session
//! id the token grants access to. Validation is a pure signature + expiry
//! check and never touches the session table.

pub mod error;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub use error::JwtError;

/// Access token lifetime: 60 minutes
pub const TOKEN_EXPIRATION_SECS: i64 = 60 * 60;

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Session id the token is scoped to
    pub sub: String,
    /// Issued at, unix seconds
    pub iat: i64,
    /// Expires at, unix seconds
    pub exp: i64,
}

/// A freshly minted access token with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWT string
    pub token: String,
    /// Expires at, unix seconds
    pub expires_at: i64,
}

/// JWT manager signing and validating access tokens with a shared secret
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    /// Creates a new JWT manager from the signing secret
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues a compact JWT scoped to a single session id
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token encoding fails
    pub fn issue_token(&self, session_id: &str) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let expires_at = (now + Duration::seconds(TOKEN_EXPIRATION_SECS)).timestamp();
        let claims = Claims {
            sub: session_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validates a token's signature and expiry and returns its claims
    ///
    /// # Errors
    ///
    /// Returns `JwtError::ValidationError` for any invalid, tampered or
    /// expired token; the reason is deliberately not surfaced to callers.
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|_| JwtError::ValidationError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_validates_and_carries_session_id() {
        let manager = JwtManager::new("test-secret");
        let issued = manager.issue_token("session-123").expect("should issue");

        let claims = manager.validate(&issued.token).expect("should validate");
        assert_eq!(claims.sub, "session-123");
        assert_eq!(claims.exp, issued.expires_at);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let manager = JwtManager::new("test-secret");
        let other = JwtManager::new("other-secret");
        let issued = other.issue_token("session-123").expect("should issue");

        assert!(matches!(
            manager.validate(&issued.token),
            Err(JwtError::ValidationError)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let manager = JwtManager::new("test-secret");

        // Hand-roll a token that expired well past the default leeway
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "session-123".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("should encode");

        assert!(matches!(
            manager.validate(&token),
            Err(JwtError::ValidationError)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let manager = JwtManager::new("test-secret");
        assert!(matches!(
            manager.validate("not-a-jwt"),
            Err(JwtError::ValidationError)
        ));
    }
}
