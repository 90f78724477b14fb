//! Offline price list: a CSV file served through the `static` catalog backend.
//!
//! ```csv
//! code,categorie,description,prix
//! T3,TOLERIE_CARROSSERIE,Aile avant,120.00
//! D1,DEBOSSELAGE,Impact < 2 cm,45.50
//! ```

use std::path::Path;

use async_trait::async_trait;
use devis_core::catalog::{CatalogConfig, CatalogFactory, StaticPriceCatalog};
use devis_core::{CatalogError, CatalogPrice, PriceCatalog};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
struct PriceRow {
    code: String,
    categorie: String,
    description: Option<String>,
    prix: Decimal,
}

/// Parses a CSV price list. Later rows replace earlier rows with the same code.
pub fn load_price_list_str(input: &str) -> Result<StaticPriceCatalog, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<PriceRow>()
        .map(|row| {
            row.map(|row| CatalogPrice {
                code: row.code,
                category: row.categorie,
                description: row.description.filter(|d| !d.is_empty()),
                price: row.prix,
            })
        })
        .collect()
}

pub fn load_price_list(path: &Path) -> Result<StaticPriceCatalog, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        CatalogError::Configuration(format!("cannot read price list '{}': {e}", path.display()))
    })?;
    let catalog = load_price_list_str(&contents).map_err(|e| {
        CatalogError::Decode(format!("invalid price list '{}': {e}", path.display()))
    })?;
    info!(path = %path.display(), entries = catalog.len(), "price list loaded");
    Ok(catalog)
}

/// Backend `static`: the endpoint is the path of a CSV price list.
pub struct StaticCatalogFactory;

#[async_trait]
impl CatalogFactory for StaticCatalogFactory {
    fn backend_name(&self) -> &'static str {
        "static"
    }

    async fn create(&self, config: &CatalogConfig) -> Result<Box<dyn PriceCatalog>, CatalogError> {
        let catalog = load_price_list(Path::new(&config.endpoint))?;
        Ok(Box::new(catalog))
    }
}
