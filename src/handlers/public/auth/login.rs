// handlers/public/auth/login.rs - POST /api/login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use super::utils::{check_password, CredentialsRequest};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

/// POST /api/login - Verify credentials and issue a bearer token
///
/// Input: `{"username": "alice", "password": "mypassword"}`
///
/// Output: `{"access_token": "eyJ...", "token_type": "Bearer", "expires_in": 3600}`
///
/// An unknown username and a wrong password produce the same 401 body and
/// take the same bcrypt work to reject.
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(payload) = payload?;
    let credentials = payload.validate()?;

    let user = state.store.find_user_by_username(&credentials.username).await?;
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let verified = check_password(&state.hasher, credentials.password, stored_hash).await?;

    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::info!("Failed login attempt");
            return Err(ApiError::unauthorized("Bad credentials"));
        }
    };

    let access_token = state.tokens.sign(&user.id.to_string())?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(ApiResponse::success(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.tokens.lifetime().num_seconds(),
    }))
}
