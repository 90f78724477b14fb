//! Sequential document numbers.
//!
//! Quotes are numbered `N°001`, `N°002`, … and invoices `001`, `002`, ….
//! Numbers are zero-padded to three digits and simply grow past `999`.
//! When the previous number is missing or cannot be read, numbering
//! restarts at one.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

const QUOTE_PREFIX: &str = "N°";

static QUOTE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*N°\s*(\d+)\s*$").expect("valid quote number regex"));

static INVOICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*$").expect("valid invoice number regex"));

fn next_in_sequence(
    pattern: &Regex,
    last: Option<&str>,
) -> u64 {
    let Some(last) = last else {
        return 1;
    };

    match pattern
        .captures(last)
        .and_then(|caps| caps[1].parse::<u64>().ok())
    {
        Some(n) => n + 1,
        None => {
            warn!(last, "unreadable document number, restarting sequence");
            1
        }
    }
}

/// Number for the quote following `last`.
///
/// ```
/// use devis_core::calculations::numbering::next_quote_number;
///
/// assert_eq!(next_quote_number(None), "N°001");
/// assert_eq!(next_quote_number(Some("N°003")), "N°004");
/// ```
pub fn next_quote_number(last: Option<&str>) -> String {
    format!("{QUOTE_PREFIX}{:03}", next_in_sequence(&QUOTE_NUMBER, last))
}

/// Number for the invoice following `last`.
pub fn next_invoice_number(last: Option<&str>) -> String {
    format!("{:03}", next_in_sequence(&INVOICE_NUMBER, last))
}
