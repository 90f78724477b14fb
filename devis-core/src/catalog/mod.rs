pub mod factory;
pub mod lookup;
pub mod static_catalog;

pub use factory::{CatalogConfig, CatalogFactory, CatalogRegistry};
pub use lookup::{CatalogError, PriceCatalog};
pub use static_catalog::StaticPriceCatalog;
