use devis_core::DiscountPercent;
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing.
///
/// Whitespace (including the narrow and non-breaking spaces French number
/// formatting uses as thousands separators) is removed. A lone comma is a
/// decimal separator (`"12,5"`); commas alongside a dot, or repeated
/// commas, are thousands separators (`"1,234.56"`).
fn normalize_decimal_input(s: &str) -> String {
    let compact: String = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let commas = compact.matches(',').count();
    if commas == 1 && !compact.contains('.') {
        compact.replace(',', ".")
    } else {
        compact.replace(',', "")
    }
}

/// Parses a string into a [`Decimal`].
///
/// Accepts plain and scientific notation and the separators described in
/// [`normalize_decimal_input`]. Empty or whitespace-only input is treated
/// as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized
        .parse()
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|e| ParseDecimalError {
            input: s.to_string(),
            source: e,
        })
}

/// Parses a form input, substituting `default` for unparsable or negative
/// values. Empty input is zero.
pub fn parse_decimal_or(
    s: &str,
    default: Decimal,
) -> Decimal {
    match parse_decimal(s) {
        Ok(value) if value >= Decimal::ZERO => value,
        Ok(value) => {
            tracing::warn!(input = %s, %value, %default, "negative value replaced by default");
            default
        }
        Err(e) => {
            tracing::warn!(input = %s, %default, "{}", e);
            default
        }
    }
}

/// Coerces a stored numeric field (JSON number or string) for a quote line.
///
/// Missing, null, unparsable, zero and negative values all fall back to
/// `default`: a saved line never loads with a zero quantity or VAT rate.
pub fn coerce_or_default(
    value: Option<&Value>,
    default: Decimal,
) -> Decimal {
    let parsed = match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => parse_decimal(&n.to_string()).ok(),
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => match parse_decimal(s) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(%default, "{}", e);
                None
            }
        },
        Some(other) => {
            tracing::warn!(value = %other, %default, "non-numeric value replaced by default");
            None
        }
    };

    match parsed {
        Some(v) if v > Decimal::ZERO => v,
        _ => default,
    }
}

/// Reads the discount field of the quote form (`remise_pourcent`).
///
/// Absent or unparsable input is no discount.
pub fn parse_discount(raw: Option<&str>) -> DiscountPercent {
    let Some(raw) = raw else {
        return DiscountPercent::ZERO;
    };
    match parse_decimal(raw) {
        Ok(percent) => DiscountPercent::new(percent),
        Err(e) => {
            tracing::warn!("discount ignored: {}", e);
            DiscountPercent::ZERO
        }
    }
}
