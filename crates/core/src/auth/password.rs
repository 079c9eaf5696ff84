//! Argon2id credential hashing.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use spendwise_shared::AppError;
use thiserror::Error;

/// Password hashing failures.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Hashing failed.
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// Verification failed for a reason other than a mismatch.
    #[error("failed to verify password: {0}")]
    Verify(String),

    /// Stored hash is not a PHC string.
    #[error("stored password hash is malformed")]
    MalformedHash,
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Hashes `password` into a PHC string with a fresh salt.
///
/// # Errors
///
/// Returns `PasswordError::Hash` if Argon2 rejects the input.
///
/// ```
/// use spendwise_core::auth::hash_password;
///
/// let hash = hash_password("hunter22").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Checks `password` against a stored PHC hash.
///
/// A mismatch is `Ok(false)`, not an error.
///
/// # Errors
///
/// Returns `PasswordError::MalformedHash` or `PasswordError::Verify`.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| PasswordError::MalformedHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}

/// Verifies against the account's hash, or burns a comparable amount of work
/// when no account was found so unknown emails answer in similar time.
///
/// Returns `false` whenever `stored_hash` is `None`.
///
/// # Errors
///
/// Same as [`verify_password`].
pub fn verify_login(password: &str, stored_hash: Option<&str>) -> Result<bool, PasswordError> {
    match stored_hash {
        Some(hash) => verify_password(password, hash),
        None => {
            hash_password(password)?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted_phc() {
        let first = hash_password("s3cret-pass").unwrap();
        let second = hash_password("s3cret-pass").unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_match_and_mismatch() {
        let hash = hash_password("s3cret-pass").unwrap();

        assert!(verify_password("s3cret-pass", &hash).unwrap());
        assert!(!verify_password("s3cret-pasS", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            verify_password("whatever", "plaintext"),
            Err(PasswordError::MalformedHash)
        ));
    }

    #[test]
    fn test_login_without_account_is_rejected() {
        assert!(!verify_login("s3cret-pass", None).unwrap());

        let hash = hash_password("s3cret-pass").unwrap();
        assert!(verify_login("s3cret-pass", Some(&hash)).unwrap());
    }

    #[test]
    fn test_maps_to_internal_error() {
        let err: AppError = PasswordError::MalformedHash.into();
        assert_eq!(err.status_code(), 500);
    }
}
