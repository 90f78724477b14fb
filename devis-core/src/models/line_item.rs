use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Task;

/// Quantity given to a new line, and to lines whose quantity cannot be read.
pub const DEFAULT_QUANTITY: Decimal = Decimal::ONE;

/// VAT rate (percent) given to a new line, and to lines whose rate cannot be read.
pub const DEFAULT_TAX_PERCENT: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// One billable line of a quote.
///
/// Serialized with the field names the quote server expects in its
/// `lignes_json` payload. Numeric fields go out as JSON numbers, since the
/// server converts them with `int()` / `float()`; they are read back from
/// either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "tache")]
    pub task: Task,
    #[serde(rename = "vehicule")]
    pub vehicle: String,
    pub description: String,
    #[serde(rename = "quantite")]
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub quantity: Decimal,
    #[serde(rename = "unite")]
    pub unit_code: String,
    #[serde(rename = "prix_unitaire_ht")]
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub unit_price_excl_tax: Decimal,
    #[serde(rename = "tva_pourcent")]
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub tax_percent: Decimal,

    /// Cached line total including VAT. Recomputed after every edit; never
    /// read back by the quote totals.
    #[serde(rename = "total_ttc", serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_incl_tax: Decimal,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            task: Task::Unassigned,
            vehicle: String::new(),
            description: String::new(),
            quantity: DEFAULT_QUANTITY,
            unit_code: String::new(),
            unit_price_excl_tax: Decimal::ZERO,
            tax_percent: DEFAULT_TAX_PERCENT,
            total_incl_tax: Decimal::ZERO,
        }
    }
}

impl LineItem {
    /// Unit price times quantity, before discount and VAT. Saturates on overflow.
    pub fn amount_excl_tax(&self) -> Decimal {
        self.unit_price_excl_tax.saturating_mul(self.quantity)
    }

    /// Returns `true` when the line carries a catalog code to look up.
    pub fn has_unit_code(&self) -> bool {
        !self.unit_code.is_empty()
    }
}
