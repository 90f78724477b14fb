//! Loads quote lines from a CSV or JSON file.
//!
//! ## CSV format
//!
//! Headers are matched by name, column order does not matter and every
//! column is optional. Missing or unusable cells take the same defaults as a
//! saved quote (see [`LineInput::into_line_item`]).
//!
//! | Column             | Type    | Notes                                   |
//! |--------------------|---------|-----------------------------------------|
//! | `tache`            | string  | `TOLERIE_CARROSSERIE`, `DEBOSSELAGE`    |
//! | `vehicule`         | string  | free text, usually a registration       |
//! | `description`      | string  |                                         |
//! | `quantite`         | decimal | default `1`                             |
//! | `unite`            | string  | catalog code                            |
//! | `prix_unitaire_ht` | decimal | default `0`                             |
//! | `tva_pourcent`     | decimal | default `20`                            |
//! | `total_ttc`        | decimal | kept until the line is next edited      |
//!
//! ```csv
//! tache,vehicule,description,quantite,unite,prix_unitaire_ht,tva_pourcent
//! DEBOSSELAGE,AB-123-CD,Impact portière,2,D1,45.50,20
//! ```
//!
//! ## JSON format
//!
//! The `lignes_json` array a quote is saved with: an array of objects using
//! the same keys, numbers either as JSON numbers or strings.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::LineInput;

#[derive(Debug, Deserialize)]
struct CsvRow {
    tache: Option<String>,
    vehicule: Option<String>,
    description: Option<String>,
    quantite: Option<String>,
    unite: Option<String>,
    prix_unitaire_ht: Option<String>,
    tva_pourcent: Option<String>,
    total_ttc: Option<String>,
}

impl From<CsvRow> for LineInput {
    fn from(row: CsvRow) -> Self {
        let text = |cell: Option<String>| cell.filter(|s| !s.is_empty());
        let number = |cell: Option<String>| text(cell).map(Value::String);

        LineInput {
            task: text(row.tache),
            vehicle: text(row.vehicule),
            description: text(row.description),
            quantity: number(row.quantite),
            unit_code: text(row.unite),
            unit_price_excl_tax: number(row.prix_unitaire_ht),
            tax_percent: number(row.tva_pourcent),
            total_incl_tax: number(row.total_ttc),
        }
    }
}

/// Errors that can occur while loading quote lines.
#[derive(Debug, thiserror::Error)]
pub enum LineLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Structurally invalid CSV (unbalanced quotes, ragged rows).
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported line file '{0}': expected a .csv or .json extension")]
    UnsupportedFormat(String),
}

/// Parses CSV text into line records, in file order.
pub fn load_csv_str(input: &str) -> Result<Vec<LineInput>, LineLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let lines = reader
        .deserialize::<CsvRow>()
        .map(|row| row.map(LineInput::from))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = lines.len(), "lines loaded from CSV");
    Ok(lines)
}

/// Parses a `lignes_json` array into line records.
///
/// A `null` or empty document is an empty quote.
pub fn load_json_str(input: &str) -> Result<Vec<LineInput>, LineLoadError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    let lines: Option<Vec<LineInput>> = serde_json::from_str(input)?;
    let lines = lines.unwrap_or_default();
    debug!(count = lines.len(), "lines loaded from JSON");
    Ok(lines)
}

/// Reads a line file from disk, choosing the format by extension.
pub fn load_from_file(path: &Path) -> Result<Vec<LineInput>, LineLoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let contents = std::fs::read_to_string(path).map_err(|source| LineLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    match extension.as_deref() {
        Some("csv") => load_csv_str(&contents),
        Some("json") => load_json_str(&contents),
        _ => Err(LineLoadError::UnsupportedFormat(path.display().to_string())),
    }
}
