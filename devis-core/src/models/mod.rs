mod catalog_price;
mod discount;
mod line_item;
mod quote_status;
mod task;

pub use catalog_price::CatalogPrice;
pub use discount::DiscountPercent;
pub use line_item::{DEFAULT_QUANTITY, DEFAULT_TAX_PERCENT, LineItem};
pub use quote_status::QuoteStatus;
pub use task::Task;
