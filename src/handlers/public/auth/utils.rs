// handlers/public/auth/utils.rs - credential helpers shared by login and register

use serde::Deserialize;

use crate::auth::{PasswordHasher, MAX_PASSWORD_BYTES};
use crate::error::{ApiError, FieldError};

/// Body of both `/api/register` and `/api/login`
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Validated credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl CredentialsRequest {
    /// Both fields must be present, non-empty strings; the password must fit
    /// in bcrypt's input.
    pub fn validate(self) -> Result<Credentials, ApiError> {
        let mut errors = Vec::new();

        let username = self.username.unwrap_or_default().trim().to_string();
        if username.is_empty() {
            errors.push(FieldError::new("username", "Username is required"));
        }

        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        } else if password.len() > MAX_PASSWORD_BYTES {
            errors.push(FieldError::new(
                "password",
                format!("Password must be at most {} bytes", MAX_PASSWORD_BYTES),
            ));
        }

        if !errors.is_empty() {
            return Err(ApiError::validation_error(errors));
        }

        Ok(Credentials { username, password })
    }
}

/// Hash off the async executor; bcrypt is deliberately slow.
pub async fn hash_password(hasher: &PasswordHasher, password: String) -> Result<String, ApiError> {
    let hasher = hasher.clone();
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| {
            tracing::error!("Hashing task failed: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })??;
    Ok(hash)
}

/// Verify off the async executor.
///
/// With no stored hash a dummy verification still runs, so a missing user is
/// as slow to reject as a wrong password.
pub async fn check_password(
    hasher: &PasswordHasher,
    password: String,
    stored_hash: Option<String>,
) -> Result<bool, ApiError> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => hasher.verify(&password, &hash),
        None => hasher.verify_dummy(&password),
    })
    .await
    .map_err(|e| {
        tracing::error!("Verification task failed: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })
}
