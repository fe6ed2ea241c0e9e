pub mod error;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use password::{PasswordHasher, MAX_PASSWORD_BYTES};
pub use token::{Claims, TokenIssuer};
