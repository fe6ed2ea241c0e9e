use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;
use crate::database::repository::Store;

/// Errors from the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Conflict on unique field: {0}")]
    Conflict(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Map a unique-constraint violation to `Conflict`, keep anything else.
    pub(crate) fn from_unique(err: sqlx::Error, field: &'static str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => DatabaseError::Conflict(field),
            _ => DatabaseError::Sqlx(err),
        }
    }
}

/// Open the store selected by configuration.
///
/// With a `DATABASE_URL` this connects a PostgreSQL pool and makes sure the
/// schema exists. Without one, or when `force_memory` is set, everything lives
/// in process memory and is lost on exit.
pub async fn connect(config: &DatabaseConfig, force_memory: bool) -> Result<Arc<dyn Store>, DatabaseError> {
    let url = match (&config.url, force_memory) {
        (Some(url), false) => url,
        _ => {
            warn!("No database configured; using in-memory store (data is not persisted)");
            return Ok(Arc::new(MemoryStore::new()));
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(url)
        .await?;

    let store = PgStore::new(pool);
    store.migrate().await?;

    info!("Connected to PostgreSQL (max {} connections)", config.max_connections);
    Ok(Arc::new(store))
}
