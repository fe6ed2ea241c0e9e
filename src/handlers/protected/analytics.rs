use axum::extract::State;

use crate::database::models::InventoryStats;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/analytics - Dashboard counters
///
/// ```json
/// {
///   "users": 3,
///   "products": 12,
///   "lowStockAlerts": 2,
///   "totalInventoryValue": 15230.5,
///   "mostAddedProduct": { "name": "Phone", "totalQuantity": 40 }
/// }
/// ```
pub async fn analytics_get(State(state): State<AppState>) -> ApiResult<InventoryStats> {
    let stats = state.store.inventory_stats().await.map_err(|e| {
        tracing::error!("Failed to compute inventory stats: {}", e);
        ApiError::internal_server_error("Failed to retrieve statistics")
    })?;
    Ok(ApiResponse::success(stats))
}
