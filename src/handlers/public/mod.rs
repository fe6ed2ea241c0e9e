// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition lives here. Every input is untrusted, so handlers validate
// all fields before touching the store.
pub mod auth;

pub use auth::*;
