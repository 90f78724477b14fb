//! TOML configuration for the `devis` binary.
//!
//! ```toml
//! [catalog]
//! backend = "http"
//! endpoint = "http://localhost:5000"
//! timeout_seconds = 10
//!
//! [logging]
//! level = "info"
//! file = "devis.log"
//! console = true
//! ```
//!
//! Every section and key is optional.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use devis_core::catalog::CatalogConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub catalog: CatalogSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    /// `http` or `static`.
    pub backend: String,
    /// Base URL for `http`, price list path for `static`.
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for CatalogSection {
    fn default() -> Self {
        let defaults = CatalogConfig::default();
        Self {
            backend: defaults.backend,
            endpoint: defaults.endpoint,
            timeout_seconds: defaults.timeout.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// EnvFilter directive; `RUST_LOG` wins when unset.
    pub level: Option<String>,
    pub file: Option<String>,
    /// Log to stderr.
    pub console: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: None,
            file: None,
            console: true,
        }
    }
}

impl FormConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file '{}'", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid config file '{}'", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("TOML parsing error")?;
        if config.catalog.timeout_seconds == 0 {
            anyhow::bail!("catalog.timeout_seconds must be at least 1");
        }
        Ok(config)
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            backend: self.catalog.backend.clone(),
            endpoint: self.catalog.endpoint.clone(),
            timeout: Duration::from_secs(self.catalog.timeout_seconds),
        }
    }
}
