use async_trait::async_trait;
use thiserror::Error;

use crate::models::CatalogPrice;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog answered but has no entry for the code.
    #[error("no price found for code '{0}'")]
    NotFound(String),

    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not a catalog entry.
    #[error("invalid catalog response: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Source of catalog prices, keyed by unit code.
#[async_trait]
pub trait PriceCatalog: Send + Sync {
    /// Fetch the catalog entry for `code`.
    async fn lookup_price(&self, code: &str) -> Result<CatalogPrice, CatalogError>;
}

#[async_trait]
impl<T: PriceCatalog + ?Sized> PriceCatalog for Box<T> {
    async fn lookup_price(&self, code: &str) -> Result<CatalogPrice, CatalogError> {
        (**self).lookup_price(code).await
    }
}
