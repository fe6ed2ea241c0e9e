// handlers/protected/mod.rs - Protected handlers
//
// Mounted behind `middleware::require_auth`; every handler can rely on an
// `AuthUser` extension being present.
pub mod analytics;
pub mod products;

pub use analytics::analytics_get;
pub use products::{product_create, product_list, product_update_quantity};
