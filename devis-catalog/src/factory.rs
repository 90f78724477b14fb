use async_trait::async_trait;

use devis_core::catalog::{CatalogConfig, CatalogError, CatalogFactory, PriceCatalog};

use crate::client::HttpPriceCatalog;

/// [`CatalogFactory`] for the HTTP price service.
///
/// Register this with a [`devis_core::catalog::CatalogRegistry`] to make the
/// `"http"` backend available:
///
/// ```rust,no_run
/// use devis_core::catalog::CatalogRegistry;
/// use devis_catalog::HttpCatalogFactory;
///
/// let mut registry = CatalogRegistry::new();
/// registry.register(Box::new(HttpCatalogFactory));
/// ```
pub struct HttpCatalogFactory;

#[async_trait]
impl CatalogFactory for HttpCatalogFactory {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    /// Build a client for the service at `config.endpoint` (scheme, host and
    /// optional base path; `/api/prix/{code}` is appended per lookup).
    async fn create(
        &self,
        config: &CatalogConfig,
    ) -> Result<Box<dyn PriceCatalog>, CatalogError> {
        let catalog = HttpPriceCatalog::new(&config.endpoint, config.timeout)?;
        Ok(Box::new(catalog))
    }
}
