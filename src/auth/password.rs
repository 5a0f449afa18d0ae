//! Password hashing with Argon2id
//!
//! Hashes are PHC strings carrying their own random salt and parameters, so
//! verification needs nothing but the stored string.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;

use crate::error::{ChirpyError, Result};

/// Hashes a password for storage
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ChirpyError::HashingError(e.to_string()))
}

/// Checks a password against a stored hash.
///
/// The comparison inside argon2 is constant-time.
pub fn verify_password(password: &str, hashed: &str) -> Result<()> {
    let parsed = PasswordHash::new(hashed)
        .map_err(|e| ChirpyError::HashingError(format!("stored hash unreadable: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(()),
        Err(password_hash::Error::Password) => Err(ChirpyError::PasswordMismatch),
        Err(e) => Err(ChirpyError::HashingError(e.to_string())),
    }
}
