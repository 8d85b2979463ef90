//! On-Balance Volume (OBV) indicator.

use crate::indicators::registry::Indicator;
use crate::models::indicators::{Candle, Column};
use crate::models::market_data::MarketData;

/// Cumulative volume signed by the direction of the close:
/// - close > previous close: OBV += volume
/// - close < previous close: OBV -= volume
/// - unchanged, or the first bar: OBV unchanged
pub fn calculate_obv(candles: &[Candle]) -> Vec<f64> {
    let mut obv = 0.0;
    let mut values = Vec::with_capacity(candles.len());
    let mut previous_close: Option<f64> = None;

    for candle in candles {
        if let Some(previous) = previous_close {
            if candle.close > previous {
                obv += candle.volume;
            } else if candle.close < previous {
                obv -= candle.volume;
            }
        }
        values.push(obv);
        previous_close = Some(candle.close);
    }

    values
}

/// OBV step of the indicator chain; adds [`Column::Obv`]. Takes no parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Obv;

impl Indicator for Obv {
    fn name(&self) -> &'static str {
        "OBV"
    }

    fn calculate(&self, data: &MarketData) -> MarketData {
        let obv = calculate_obv(data.candles());
        data.with_column(Column::Obv, obv.into_iter().map(Some).collect())
    }
}
