use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    InventoryStats, NewProduct, NewUser, Product, ProductQuery, ProductTotal, User, LOW_STOCK_THRESHOLD,
};
use crate::database::repository::Store;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            UUID PRIMARY KEY,
        username      TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id           UUID PRIMARY KEY,
        name         TEXT NOT NULL,
        product_type TEXT,
        sku          TEXT UNIQUE,
        image_url    TEXT,
        description  TEXT,
        quantity     BIGINT NOT NULL DEFAULT 0,
        price        DOUBLE PRECISION NOT NULL,
        created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at   TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS products_created_at_idx ON products (created_at DESC)",
];

const PRODUCT_COLUMNS: &str =
    "id, name, product_type, sku, image_url, description, quantity, price, created_at, updated_at";

/// `ILIKE` pattern matching `needle` anywhere, with `%`, `_` and `\` taken literally.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// PostgreSQL-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if they are missing.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, password_hash, created_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, username, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_unique(e, "username"))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM products \
             WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\\' OR description ILIKE $1 ESCAPE '\\') \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3",
            PRODUCT_COLUMNS
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(query.search.as_deref().map(contains_pattern))
            .bind(i64::from(query.limit))
            .bind(query.offset() as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO products ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) \
             RETURNING {}",
            PRODUCT_COLUMNS, PRODUCT_COLUMNS
        );

        sqlx::query_as::<_, Product>(&sql)
            .bind(Uuid::new_v4())
            .bind(&product.name)
            .bind(&product.product_type)
            .bind(&product.sku)
            .bind(&product.image_url)
            .bind(&product.description)
            .bind(product.quantity)
            .bind(product.price)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_unique(e, "sku"))
    }

    async fn update_quantity(&self, id: Uuid, quantity: i64) -> Result<Product, DatabaseError> {
        let sql = format!(
            "UPDATE products SET quantity = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        );

        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(quantity)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("product {}", id)))
    }

    async fn inventory_stats(&self) -> Result<InventoryStats, DatabaseError> {
        let users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users").fetch_one(&self.pool);
        let products = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products").fetch_one(&self.pool);
        let low_stock = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE quantity < $1")
            .bind(LOW_STOCK_THRESHOLD)
            .fetch_one(&self.pool);
        let total_value = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(quantity * price), 0)::float8 FROM products",
        )
        .fetch_one(&self.pool);
        let most_added = sqlx::query_as::<_, ProductTotal>(
            "SELECT name, SUM(quantity)::bigint AS total_quantity FROM products \
             GROUP BY name ORDER BY total_quantity DESC, name ASC LIMIT 1",
        )
        .fetch_optional(&self.pool);

        let (users, products, low_stock_alerts, total_inventory_value, most_added_product) =
            tokio::try_join!(users, products, low_stock, total_value, most_added)?;

        Ok(InventoryStats {
            users,
            products,
            low_stock_alerts,
            total_inventory_value,
            most_added_product,
        })
    }
}
