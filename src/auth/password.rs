//! Password hashing using Argon2id

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;
use tracing::warn;

use crate::shared::AppError;

/// Hash a password using Argon2id with a random salt.
///
/// Returns the hash in PHC string format.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            warn!(error = %e, "Failed to hash password");
            AppError::Internal
        })
}

/// Verify a password against a stored PHC hash.
///
/// Returns `false` on mismatch and on a hash that cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// Runs a full verification against a throwaway hash and discards the result.
///
/// Lets a lookup miss take as long as a wrong password.
pub fn verify_dummy_password(password: &str) -> bool {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    match DUMMY_HASH.get_or_init(|| hash_password("not-a-real-account").ok()) {
        Some(hash) => verify_password(password, hash),
        None => false,
    }
}
