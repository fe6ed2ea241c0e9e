// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (bearer token required)
pub mod public;    // /api/register, /api/login
pub mod protected; // /api/products*, /api/analytics
