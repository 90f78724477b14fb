use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::lookup::{CatalogError, PriceCatalog};

/// Backend-agnostic catalog configuration.
///
/// `backend` must match the [`CatalogFactory::backend_name`] of a
/// registered factory.  `endpoint` is passed through to that factory
/// unchanged; its meaning is entirely backend-specific.
///
/// | backend   | endpoint examples                        |
/// |-----------|------------------------------------------|
/// | `http`    | `http://localhost:5000`                  |
/// | `static`  | `prix.csv` (a price list on disk)        |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"http"`).
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub endpoint: String,
    /// Upper bound on a single lookup, for backends that do I/O.
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend: "http".to_string(),
            endpoint: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// One implementation per catalog backend.  Each backend exports a unit
/// struct that implements this trait and is registered with a
/// [`CatalogRegistry`] at startup.
#[async_trait]
pub trait CatalogFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Build a ready-to-use catalog from `config`.
    async fn create(&self, config: &CatalogConfig) -> Result<Box<dyn PriceCatalog>, CatalogError>;
}

/// Registry of [`CatalogFactory`] instances, keyed by backend name.
pub struct CatalogRegistry {
    factories: HashMap<&'static str, Box<dyn CatalogFactory>>,
}

impl CatalogRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory.
    ///
    /// If a factory with the same [`CatalogFactory::backend_name`] is
    /// already present it is silently replaced.
    pub fn register(&mut self, factory: Box<dyn CatalogFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.backend` and return
    /// the catalog it produces.
    ///
    /// # Errors
    /// * [`CatalogError::Configuration`]: no factory is registered for
    ///   the requested backend name.
    /// * Any error the chosen factory itself returns.
    pub async fn create(
        &self,
        config: &CatalogConfig,
    ) -> Result<Box<dyn PriceCatalog>, CatalogError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                CatalogError::Configuration(format!(
                    "unknown catalog backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config).await
    }
}

impl Default for CatalogRegistry {
    fn default() -> Self {
        Self::new()
    }
}
