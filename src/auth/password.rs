use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{error, warn};

use crate::error::{AppError, AppResult};

fn hash_blocking(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })
}

// A stored value that is not a PHC string never matches.
fn verify_blocking(plain: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "stored password hash is not parseable");
            false
        }
    }
}

/// Hashes on the blocking pool; argon2 is deliberately slow.
pub async fn hash_password(plain: String) -> AppResult<String> {
    let hashed = tokio::task::spawn_blocking(move || hash_blocking(&plain))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    Ok(hashed)
}

pub async fn verify_password(plain: String, stored: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify_blocking(&plain, &stored))
        .await
        .map_err(|e| AppError::Internal(e.into()))
}
