//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod market;
pub mod market_data;
pub mod signal;

pub use indicators::{Candle, Column, MacdParams, RsiParams};
pub use market::{parse_window, validate_window, AssetClass, Interval, Period};
pub use market_data::{MarketData, OhlcvColumns};
pub use signal::{SignalDirection, SignalResult, SignalRow};
