// handlers/protected/products/mod.rs - product inventory endpoints

pub mod create;   // POST /api/products
pub mod list;     // GET /api/products
pub mod quantity; // PUT /api/products/:id/quantity

pub use create::product_create;
pub use list::product_list;
pub use quantity::product_update_quantity;
