// handlers/public/auth/mod.rs - Public authentication handlers

pub mod login;    // POST /api/login - verify credentials and issue a token
pub mod register; // POST /api/register - create an account
pub mod utils;

pub use login::login_post;
pub use register::register_post;
