//! Product catalog (pure in-memory domain logic, no IO).

pub mod catalog;
pub mod product;
pub mod seed;

pub use catalog::ProductCatalog;
pub use product::{Dimensions, Product, ProductDraft, ProductPatch};
