// handlers/public/auth/register.rs - POST /api/register handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::utils::{hash_password, CredentialsRequest};
use crate::database::models::NewUser;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const USERNAME_TAKEN: &str = "Username already exists";

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub msg: &'static str,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

/// POST /api/register - Create a user account
///
/// Input: `{"username": "alice", "password": "mysecret"}`
///
/// Output (201): `{"msg": "User created", "userId": "<uuid>"}`
///
/// Errors: 400 on missing or empty fields, 409 when the username is taken.
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<RegisterResponse> {
    let Json(payload) = payload?;
    let credentials = payload.validate()?;

    // Skip the bcrypt work for the common duplicate case; the unique
    // constraint still catches concurrent registrations below.
    if state.store.find_user_by_username(&credentials.username).await?.is_some() {
        return Err(ApiError::conflict(USERNAME_TAKEN));
    }

    let password_hash = hash_password(&state.hasher, credentials.password).await?;

    let user = state
        .store
        .create_user(NewUser {
            username: credentials.username,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            DatabaseError::Conflict(_) => ApiError::conflict(USERNAME_TAKEN),
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(ApiResponse::created(RegisterResponse {
        msg: "User created",
        user_id: user.id,
    }))
}
