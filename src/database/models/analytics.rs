use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Products with fewer units than this count as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub users: i64,
    pub products: i64,
    pub low_stock_alerts: i64,
    pub total_inventory_value: f64,
    pub most_added_product: Option<ProductTotal>,
}

/// Units summed over every product sharing a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductTotal {
    pub name: String,
    pub total_quantity: i64,
}
