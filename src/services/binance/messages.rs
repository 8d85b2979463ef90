//! Binance kline payloads.
//!
//! A kline is a JSON array:
//! `[open_time_ms, "open", "high", "low", "close", "volume", close_time_ms, ...]`.

use crate::error::SignalErrorKind;
use crate::models::indicators::Candle;
use chrono::DateTime;
use serde_json::Value;

pub type RawKline = Vec<Value>;

/// Parses one kline into a candle indexed by its open time.
pub fn parse_kline(raw: &RawKline) -> Result<Candle, SignalErrorKind> {
    if raw.len() < 6 {
        return Err(SignalErrorKind::SchemaError(format!(
            "kline has {} fields, expected at least 6",
            raw.len()
        )));
    }

    let open_time = raw[0].as_i64().ok_or_else(|| field_error("timestamp", &raw[0]))?;
    let timestamp = DateTime::from_timestamp_millis(open_time)
        .ok_or_else(|| field_error("timestamp", &raw[0]))?;

    Ok(Candle::new(
        number(&raw[1], "open")?,
        number(&raw[2], "high")?,
        number(&raw[3], "low")?,
        number(&raw[4], "close")?,
        number(&raw[5], "volume")?,
        timestamp,
    ))
}

/// Binance sends prices as decimal strings; plain numbers are accepted too.
fn number(value: &Value, field: &str) -> Result<f64, SignalErrorKind> {
    match value {
        Value::String(s) => s.parse::<f64>().map_err(|_| field_error(field, value)),
        Value::Number(n) => n.as_f64().ok_or_else(|| field_error(field, value)),
        _ => Err(field_error(field, value)),
    }
}

fn field_error(field: &str, value: &Value) -> SignalErrorKind {
    SignalErrorKind::SchemaError(format!("invalid kline {}: {}", field, value))
}

/// `BTC/USDT` -> `BTCUSDT`.
pub fn exchange_pair(symbol: &str) -> String {
    symbol
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_uppercase()
}
