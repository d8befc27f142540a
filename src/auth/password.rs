/// Password Hashing and Verification
///
/// bcrypt is CPU-bound; the async wrappers move the work onto the blocking
/// pool so an event-loop worker keeps serving other requests meanwhile.

use bcrypt::{hash, verify};

use crate::error::{AppError, ValidationError};

/// Hash a password using bcrypt
///
/// # Errors
/// Returns error if the password is blank or bcrypt fails
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    validate_password(password)?;

    hash(password, cost)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its hash
///
/// # Errors
/// Returns error if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
}

pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost)).await?
}

pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.trim().is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField(
            "password".to_string(),
        )));
    }

    Ok(())
}
