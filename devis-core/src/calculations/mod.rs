//! Quote calculation modules.
//!
//! This module provides the arithmetic behind the quote form: line and quote
//! totals, document numbering and invoice settlement.

pub mod common;
pub mod numbering;
pub mod settlement;
pub mod totals;

pub use settlement::{InvoiceDraft, PaymentMethod, PaymentState, SettlementError};
pub use totals::{QuoteCalculator, QuoteTotals, line_total_incl_tax, recompute_line};
