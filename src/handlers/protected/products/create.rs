use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{NewProduct, Product};
use crate::database::DatabaseError;
use crate::error::{ApiError, FieldError};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub sku: Option<String>,
    #[serde(rename = "imageUrl", alias = "image_url")]
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl CreateProductRequest {
    pub fn validate(self) -> Result<NewProduct, ApiError> {
        let mut errors = Vec::new();

        let name = non_empty(self.name);
        if name.is_none() {
            errors.push(FieldError::new("name", "Name is required"));
        }

        let price = self.price.filter(|p| p.is_finite() && *p > 0.0);
        if price.is_none() {
            errors.push(FieldError::new("price", "Price must be a number greater than 0"));
        }

        let quantity = self.quantity.unwrap_or(0);
        if quantity < 0 {
            errors.push(FieldError::new("quantity", "Quantity must be an integer >= 0"));
        }

        match (name, price) {
            (Some(name), Some(price)) if errors.is_empty() => Ok(NewProduct {
                name,
                product_type: non_empty(self.product_type),
                sku: non_empty(self.sku),
                image_url: non_empty(self.image_url),
                description: non_empty(self.description),
                quantity,
                price,
            }),
            _ => Err(ApiError::validation_error(errors)),
        }
    }
}

/// Created product plus `product_id`, which older clients read.
#[derive(Debug, Serialize)]
pub struct CreatedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub product_id: Uuid,
}

/// POST /api/products - Add a product
///
/// Errors: 400 on an empty name, non-positive price or negative quantity;
/// 409 when the SKU is already used.
pub async fn product_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> ApiResult<CreatedProduct> {
    let Json(payload) = payload?;
    let new_product = payload.validate()?;

    let product = state.store.create_product(new_product).await.map_err(|e| match e {
        DatabaseError::Conflict(_) => ApiError::conflict("Duplicate SKU"),
        other => other.into(),
    })?;

    tracing::info!(product_id = %product.id, user_id = %user.user_id, "Product created");

    Ok(ApiResponse::created(CreatedProduct {
        product_id: product.id,
        product,
    }))
}
