//! Ticker catalogue offered to users, per asset class.
//!
//! Labels are what a user picks; symbols are what the provider expects.

use crate::models::market::AssetClass;

pub const STOCKS: &[(&str, &str)] = &[
    ("AAPL", "AAPL"),
    ("TSLA", "TSLA"),
    ("GOOG", "GOOG"),
    ("MSFT", "MSFT"),
    ("AMZN", "AMZN"),
];

pub const INDICES: &[(&str, &str)] = &[
    ("SP500", "^GSPC"),
    ("NASDAQ", "^IXIC"),
    ("DOWJ", "^DJI"),
    ("FTSE", "^FTSE"),
    ("NIKKEI", "^N225"),
];

pub const COMMODITIES: &[(&str, &str)] = &[
    ("GOLD", "GC=F"),
    ("SILVER", "SI=F"),
    ("OIL", "CL=F"),
    ("NATGAS", "NG=F"),
];

pub const FOREX: &[(&str, &str)] = &[
    ("EUR/USD", "EURUSD=X"),
    ("GBP/USD", "GBPUSD=X"),
    ("USD/JPY", "USDJPY=X"),
    ("AUD/USD", "AUDUSD=X"),
    ("USD/CHF", "USDCHF=X"),
];

pub const CRYPTO: &[(&str, &str)] = &[
    ("BTC/USDT", "BTC/USDT"),
    ("ETH/USDT", "ETH/USDT"),
    ("SOL/USDT", "SOL/USDT"),
    ("BNB/USDT", "BNB/USDT"),
    ("ADA/USDT", "ADA/USDT"),
];

/// `(label, provider symbol)` pairs for an asset class.
pub fn catalogue(asset_class: AssetClass) -> &'static [(&'static str, &'static str)] {
    match asset_class {
        AssetClass::Stocks => STOCKS,
        AssetClass::Indices => INDICES,
        AssetClass::Commodities => COMMODITIES,
        AssetClass::Forex => FOREX,
        AssetClass::Crypto => CRYPTO,
    }
}

/// Provider symbol for a catalogue label; anything else passes through unchanged.
pub fn resolve_symbol(asset_class: AssetClass, label: &str) -> String {
    catalogue(asset_class)
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(label.trim()))
        .map(|(_, symbol)| symbol.to_string())
        .unwrap_or_else(|| label.trim().to_string())
}
