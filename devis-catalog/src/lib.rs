//! HTTP backend for the quote price catalog.

mod client;
mod factory;

pub use client::HttpPriceCatalog;
pub use factory::HttpCatalogFactory;
