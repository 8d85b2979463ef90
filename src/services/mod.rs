//! Market data sources.

pub mod binance;
pub mod market_data;
pub mod yahoo;

pub use binance::BinanceProvider;
pub use market_data::{DataProvider, ProviderSet};
pub use yahoo::YahooFinanceProvider;
