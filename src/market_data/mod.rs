pub mod price_series;

// Re-export the loader for convenient access (e.g. `use crate::market_data::load_price_series`).
pub use price_series::{load_price_series, parse_price_series};
