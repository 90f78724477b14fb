//! Quote (devis) form engine: editable quote lines, derived totals and
//! catalog price lookups, plus the configuration, logging and import
//! plumbing the `devis` binary needs.

pub mod app;
pub mod config;
pub mod line_loader;
pub mod logging;
pub mod models;
pub mod price_list;
pub mod state;
pub mod utils;

pub use models::{LineInput, QuoteFormModel, QuoteSubmission};
pub use state::{LineEdit, LineId, LookupOutcome, PriceLookup, QuoteFormState, SubmitError};
