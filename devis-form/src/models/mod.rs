mod line_input;
mod quote_form;

pub use line_input::LineInput;
pub use quote_form::{DEFAULT_VALIDITY_DAYS, QuoteFormModel, QuoteSubmission};
