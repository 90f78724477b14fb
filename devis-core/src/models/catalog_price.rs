use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Task;

/// A price catalog entry, as returned by `GET /api/prix/{code}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPrice {
    #[serde(default)]
    pub code: String,
    #[serde(rename = "categorie")]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "prix")]
    pub price: Decimal,
}

impl CatalogPrice {
    /// Task a line takes on when priced from this entry.
    pub fn task(&self) -> Task {
        Task::from_category(&self.category)
    }
}
