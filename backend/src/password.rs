//! Share password generation and hashing
//!
//! Passwords are short, human-enterable, and generated server-side; only
//! the bcrypt hash is persisted. The plaintext is returned to the organizer
//! exactly once at session creation and must never be logged.

use bcrypt::{hash, verify, DEFAULT_COST};
use rand::{distributions::Alphanumeric, Rng};
use thiserror::Error;

/// Length of generated share passwords
const PASSWORD_LENGTH: usize = 6;

/// Errors that can occur during password hashing operations
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Hashing or hash parsing failed
    #[error("Hash error: {0}")]
    HashError(String),
}

/// Generates a random alphanumeric share password
#[must_use]
pub fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

/// Hashes a password with bcrypt and a fresh salt
///
/// # Errors
///
/// Returns `PasswordError::HashError` if bcrypt fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash(password, DEFAULT_COST).map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against its stored bcrypt hash
///
/// bcrypt re-derives the hash with the stored salt and compares in constant
/// time. A malformed stored hash is an error, not a mismatch.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if the stored hash cannot be parsed
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PasswordError> {
    verify(password, password_hash).map_err(|e| PasswordError::HashError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_passwords_are_short_alphanumeric() {
        let password = generate_password();
        assert_eq!(password.len(), PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn hash_verifies_original_and_rejects_others() {
        let password = generate_password();
        let password_hash = hash_password(&password).expect("should hash");

        assert!(verify_password(&password, &password_hash).expect("should verify"));
        assert!(!verify_password("wrong", &password_hash).expect("should verify"));
    }

    #[test]
    fn same_password_hashes_differently_per_salt() {
        let first = hash_password("abc123").expect("should hash");
        let second = hash_password("abc123").expect("should hash");
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(verify_password("abc123", "not-a-bcrypt-hash").is_err());
    }
}
