use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::Product;
use crate::database::DatabaseError;
use crate::error::{ApiError, FieldError};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: Option<Value>,
}

/// Check the path id and body together so the client sees every problem.
fn validate(id: &str, body: UpdateQuantityRequest) -> Result<(Uuid, i64), ApiError> {
    let mut errors = Vec::new();

    let id = Uuid::parse_str(id).ok();
    if id.is_none() {
        errors.push(FieldError::new("id", "Invalid product id"));
    }

    let quantity = body.quantity.as_ref().and_then(Value::as_i64).filter(|q| *q >= 0);
    if quantity.is_none() {
        errors.push(FieldError::new("quantity", "Quantity must be an integer >= 0"));
    }

    match (id, quantity) {
        (Some(id), Some(quantity)) => Ok((id, quantity)),
        _ => Err(ApiError::validation_error(errors)),
    }
}

/// PUT /api/products/:id/quantity - Replace the stock count
///
/// Input: `{"quantity": 15}`. Returns the updated product, 404 for an
/// unknown id.
pub async fn product_update_quantity(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateQuantityRequest>, JsonRejection>,
) -> ApiResult<Product> {
    let Json(payload) = payload?;
    let (id, quantity) = validate(&id, payload)?;

    let product = state.store.update_quantity(id, quantity).await.map_err(|e| match e {
        DatabaseError::NotFound(_) => ApiError::not_found("Not found"),
        other => other.into(),
    })?;

    tracing::info!(product_id = %id, quantity, user_id = %user.user_id, "Quantity updated");
    Ok(ApiResponse::success(product))
}
