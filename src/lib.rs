//! Technical-analysis signal engine.
//!
//! Fetches OHLCV history for a ticker, derives RSI, MACD and OBV, and fuses
//! them into Buy/Sell/Hold signals with a confidence and an exit price.

pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use error::{RequestContext, SignalError, SignalErrorKind};
pub use signals::{SignalEngine, SignalRequest};
