use crate::models::market::{AssetClass, Interval, Period};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalDirection {
    Buy,
    Sell,
    Hold,
}

impl SignalDirection {
    /// Numeric encoding used in the row table: 1 buy, -1 sell, 0 hold.
    pub fn as_i8(&self) -> i8 {
        match self {
            SignalDirection::Buy => 1,
            SignalDirection::Sell => -1,
            SignalDirection::Hold => 0,
        }
    }

    pub fn is_directional(&self) -> bool {
        !matches!(self, SignalDirection::Hold)
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SignalDirection::Buy => "Buy",
            SignalDirection::Sell => "Sell",
            SignalDirection::Hold => "Hold",
        };
        f.write_str(label)
    }
}

/// One scored bar of generator output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub timestamp: DateTime<Utc>,
    pub signal: SignalDirection,
    pub confidence: f64,
    pub ticker: String,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub obv: Option<f64>,
    pub close: f64,
    pub exit_price: Option<f64>,
}

/// Outcome of one signal computation, read off the newest row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub signal: SignalDirection,
    pub confidence: f64,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub ticker: String,
    pub asset_class: AssetClass,
    pub period: Period,
    pub interval: Interval,
    /// Trailing window, newest last.
    pub rows: Vec<SignalRow>,
}

impl SignalResult {
    pub fn from_rows(
        rows: Vec<SignalRow>,
        ticker: &str,
        asset_class: AssetClass,
        period: Period,
        interval: Interval,
    ) -> Self {
        let latest = rows.last();
        let signal = latest.map_or(SignalDirection::Hold, |row| row.signal);
        let (entry_price, exit_price) = match latest {
            Some(row) if row.signal.is_directional() => (Some(row.close), row.exit_price),
            _ => (None, None),
        };

        Self {
            signal,
            confidence: latest.map_or(0.0, |row| row.confidence.clamp(0.0, 1.0)),
            entry_price,
            exit_price,
            ticker: ticker.to_string(),
            asset_class,
            period,
            interval,
            rows,
        }
    }

    /// Plain-text summary for chat rendering.
    pub fn report(&self) -> String {
        let price = |value: Option<f64>| {
            value
                .map(|v| format!("${:.2}", v))
                .unwrap_or_else(|| "N/A".to_string())
        };

        format!(
            "Signal Report\n\
             Ticker: {}\n\
             Asset Type: {}\n\
             Period: {}\n\
             Interval: {}\n\
             Direction: {}\n\
             Entry Point: {}\n\
             Exit Point: {}\n\
             Confidence: {:.1}%",
            self.ticker,
            self.asset_class,
            self.period,
            self.interval,
            self.signal,
            price(self.entry_price),
            price(self.exit_price),
            (self.confidence * 100.0).min(100.0),
        )
    }
}
