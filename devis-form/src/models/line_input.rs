use devis_core::{DEFAULT_QUANTITY, DEFAULT_TAX_PERCENT, LineItem, Task};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::utils::coerce_or_default;

/// A quote line as stored by the server and handed back when a saved quote
/// is edited.
///
/// Every field is optional and numeric fields may arrive as numbers or
/// strings; [`LineInput::into_line_item`] applies the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineInput {
    #[serde(rename = "tache")]
    pub task: Option<String>,
    #[serde(rename = "vehicule")]
    pub vehicle: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "quantite")]
    pub quantity: Option<Value>,
    #[serde(rename = "unite")]
    pub unit_code: Option<String>,
    #[serde(rename = "prix_unitaire_ht")]
    pub unit_price_excl_tax: Option<Value>,
    #[serde(rename = "tva_pourcent")]
    pub tax_percent: Option<Value>,
    #[serde(rename = "total_ttc")]
    pub total_incl_tax: Option<Value>,
}

impl LineInput {
    /// Builds a line, substituting defaults for missing or unusable values.
    ///
    /// The stored `total_ttc` is kept as-is; it is refreshed on the next edit.
    pub fn into_line_item(self) -> LineItem {
        let task = match self.task.as_deref() {
            None => Task::Unassigned,
            Some(code) => Task::parse(code).unwrap_or_else(|| {
                warn!(code, "unknown task code, line left unassigned");
                Task::Unassigned
            }),
        };

        LineItem {
            task,
            vehicle: self.vehicle.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            quantity: coerce_or_default(self.quantity.as_ref(), DEFAULT_QUANTITY),
            unit_code: self.unit_code.unwrap_or_default(),
            unit_price_excl_tax: coerce_or_default(self.unit_price_excl_tax.as_ref(), Decimal::ZERO),
            tax_percent: coerce_or_default(self.tax_percent.as_ref(), DEFAULT_TAX_PERCENT),
            total_incl_tax: coerce_or_default(self.total_incl_tax.as_ref(), Decimal::ZERO),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_record_takes_every_default() {
        let line = LineInput::default().into_line_item();

        assert_eq!(line, LineItem::default());
    }

    #[test]
    fn saved_line_is_loaded_verbatim() {
        let input: LineInput = serde_json::from_str(
            r#"{"tache":"DEBOSSELAGE","vehicule":"AB-123-CD","description":"Impact porte",
                "quantite":2,"unite":"D1","prix_unitaire_ht":45.5,"tva_pourcent":20,"total_ttc":109.2}"#,
        )
        .unwrap();

        let line = input.into_line_item();

        assert_eq!(line.task, Task::Debosselage);
        assert_eq!(line.vehicle, "AB-123-CD");
        assert_eq!(line.quantity, dec!(2));
        assert_eq!(line.unit_code, "D1");
        assert_eq!(line.unit_price_excl_tax, dec!(45.5));
        assert_eq!(line.total_incl_tax, dec!(109.2));
    }

    #[test]
    fn string_numbers_are_parsed() {
        let input: LineInput =
            serde_json::from_str(r#"{"quantite":"3","prix_unitaire_ht":"12,50","tva_pourcent":"5.5"}"#)
                .unwrap();

        let line = input.into_line_item();

        assert_eq!(line.quantity, dec!(3));
        assert_eq!(line.unit_price_excl_tax, dec!(12.50));
        assert_eq!(line.tax_percent, dec!(5.5));
    }

    #[test]
    fn unusable_numbers_fall_back_to_defaults() {
        let input: LineInput = serde_json::from_str(
            r#"{"quantite":"beaucoup","prix_unitaire_ht":null,"tva_pourcent":0,"total_ttc":"?"}"#,
        )
        .unwrap();

        let line = input.into_line_item();

        assert_eq!(line.quantity, dec!(1));
        assert_eq!(line.unit_price_excl_tax, dec!(0));
        assert_eq!(line.tax_percent, dec!(20));
        assert_eq!(line.total_incl_tax, dec!(0));
    }

    #[test]
    fn unknown_task_is_unassigned() {
        let input = LineInput {
            task: Some("PEINTURE".to_string()),
            ..Default::default()
        };

        assert_eq!(input.into_line_item().task, Task::Unassigned);
    }
}
