use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{InventoryStats, NewProduct, NewUser, Product, ProductQuery, User};

/// Persistence operations the HTTP layer depends on.
///
/// Implementations own their connections. Pagination and search are applied
/// here, never in handlers.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap connectivity check for `/health`.
    async fn ping(&self) -> Result<(), DatabaseError>;

    /// Fails with `Conflict` when the username is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    /// Newest first.
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, DatabaseError>;

    /// Fails with `Conflict` when a non-empty SKU is already used.
    async fn create_product(&self, product: NewProduct) -> Result<Product, DatabaseError>;

    /// Fails with `NotFound` for an unknown id.
    async fn update_quantity(&self, id: Uuid, quantity: i64) -> Result<Product, DatabaseError>;

    async fn inventory_stats(&self) -> Result<InventoryStats, DatabaseError>;
}
