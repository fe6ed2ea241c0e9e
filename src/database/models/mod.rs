pub mod analytics;
pub mod product;
pub mod user;

pub use analytics::{InventoryStats, ProductTotal, LOW_STOCK_THRESHOLD};
pub use product::{NewProduct, Product, ProductQuery};
pub use user::{NewUser, User};
