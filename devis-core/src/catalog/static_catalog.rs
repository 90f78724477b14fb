use std::collections::HashMap;

use async_trait::async_trait;

use super::lookup::{CatalogError, PriceCatalog};
use crate::models::CatalogPrice;

/// In-memory catalog, keyed by code.
///
/// Backs the `static` catalog backend (a price list loaded from disk) and
/// stands in for the HTTP catalog in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceCatalog {
    prices: HashMap<String, CatalogPrice>,
}

impl StaticPriceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the entry for `price.code`.
    pub fn insert(&mut self, price: CatalogPrice) {
        self.prices.insert(price.code.clone(), price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<CatalogPrice> for StaticPriceCatalog {
    fn from_iter<I: IntoIterator<Item = CatalogPrice>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for price in iter {
            catalog.insert(price);
        }
        catalog
    }
}

#[async_trait]
impl PriceCatalog for StaticPriceCatalog {
    async fn lookup_price(&self, code: &str) -> Result<CatalogPrice, CatalogError> {
        self.prices
            .get(code)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn price(code: &str) -> CatalogPrice {
        CatalogPrice {
            code: code.to_string(),
            category: "DEBOSSELAGE".to_string(),
            description: None,
            price: dec!(10),
        }
    }

    #[tokio::test]
    async fn finds_known_code() {
        let catalog: StaticPriceCatalog = [price("D1"), price("D2")].into_iter().collect();

        let found = catalog.lookup_price("D2").await.unwrap();

        assert_eq!(found.code, "D2");
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let catalog = StaticPriceCatalog::new();

        assert_eq!(
            catalog.lookup_price("ZZ").await,
            Err(CatalogError::NotFound("ZZ".to_string()))
        );
    }

    #[test]
    fn insert_replaces_same_code() {
        let mut catalog = StaticPriceCatalog::new();
        catalog.insert(price("D1"));
        catalog.insert(CatalogPrice {
            price: dec!(99),
            ..price("D1")
        });

        assert_eq!(catalog.len(), 1);
    }
}
