use axum::extract::{Query, State};
use serde::Deserialize;

use crate::database::models::{Product, ProductQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Raw query string. Unparseable values fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl ListParams {
    pub fn into_query(self) -> ProductQuery {
        let page = self
            .page
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let limit = self
            .limit
            .and_then(|l| l.trim().parse::<u32>().ok())
            .unwrap_or(ProductQuery::DEFAULT_LIMIT)
            .clamp(1, ProductQuery::MAX_LIMIT);
        let search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        ProductQuery { page, limit, search }
    }
}

/// GET /api/products?page=1&limit=10&search=phone
///
/// Returns a JSON array of products, newest first.
pub async fn product_list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Product>> {
    let query = params.into_query();
    let products = state.store.list_products(&query).await?;
    Ok(ApiResponse::success(products))
}
