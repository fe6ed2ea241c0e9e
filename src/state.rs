use std::sync::Arc;

use chrono::Duration;

use crate::auth::{PasswordHasher, TokenIssuer};
use crate::config::AppConfig;
use crate::database::Store;

/// Shared, read-only request context.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub hasher: PasswordHasher,
    pub tokens: TokenIssuer,
    pub store: Arc<dyn Store>,
}

impl AppState {
    /// Build the credential services from configuration.
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        let hasher = PasswordHasher::new(config.security.bcrypt_cost);
        let tokens = TokenIssuer::new(
            &config.security.jwt_secret,
            Duration::minutes(config.security.jwt_expiry_minutes),
        );

        Self {
            config: Arc::new(config),
            hasher,
            tokens,
            store,
        }
    }
}
