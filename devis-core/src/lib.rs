pub mod calculations;
pub mod catalog;
pub mod models;

pub use catalog::{CatalogError, PriceCatalog};
pub use models::*;
