use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    InventoryStats, NewProduct, NewUser, Product, ProductQuery, ProductTotal, User, LOW_STOCK_THRESHOLD,
};
use crate::database::repository::Store;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    // Insertion order doubles as creation order.
    products: Vec<Product>,
}

/// Process-local store for development and tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_search(product: &Product, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    product.name.to_lowercase().contains(&needle)
        || product
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(DatabaseError::Conflict("username"));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, DatabaseError> {
        let tables = self.tables.read().await;
        let search = query.search.as_deref().filter(|s| !s.is_empty());

        Ok(tables
            .products
            .iter()
            .rev()
            .filter(|p| search.map_or(true, |needle| matches_search(p, needle)))
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(sku) = &product.sku {
            if tables.products.iter().any(|p| p.sku.as_ref() == Some(sku)) {
                return Err(DatabaseError::Conflict("sku"));
            }
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: product.name,
            product_type: product.product_type,
            sku: product.sku,
            image_url: product.image_url,
            description: product.description,
            quantity: product.quantity,
            price: product.price,
            created_at: now,
            updated_at: now,
        };
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn update_quantity(&self, id: Uuid, quantity: i64) -> Result<Product, DatabaseError> {
        let mut tables = self.tables.write().await;
        let product = tables
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DatabaseError::NotFound(format!("product {}", id)))?;

        product.quantity = quantity;
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn inventory_stats(&self) -> Result<InventoryStats, DatabaseError> {
        let tables = self.tables.read().await;

        let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
        for product in &tables.products {
            *totals.entry(product.name.as_str()).or_default() += product.quantity;
        }
        // BTreeMap iterates names ascending, so ties go to the first name.
        let most_added_product = totals
            .into_iter()
            .fold(None::<(&str, i64)>, |best, (name, total)| match best {
                Some((_, best_total)) if best_total >= total => best,
                _ => Some((name, total)),
            })
            .map(|(name, total_quantity)| ProductTotal {
                name: name.to_string(),
                total_quantity,
            });

        Ok(InventoryStats {
            users: tables.users.len() as i64,
            products: tables.products.len() as i64,
            low_stock_alerts: tables
                .products
                .iter()
                .filter(|p| p.quantity < LOW_STOCK_THRESHOLD)
                .count() as i64,
            total_inventory_value: tables
                .products
                .iter()
                .map(|p| p.quantity as f64 * p.price)
                .sum(),
            most_added_product,
        })
    }
}
