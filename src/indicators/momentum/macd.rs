//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::registry::Indicator;
use crate::indicators::validation::validate_macd_params;
use crate::models::indicators::{Column, MacdParams};
use crate::models::market_data::MarketData;

/// Calculate the MACD and signal lines over `closes`
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
///
/// Every EMA is seeded with its first input, so both lines are defined
/// from the first bar.
pub fn calculate_macd(closes: &[f64], params: &MacdParams) -> (Vec<f64>, Vec<f64>) {
    let fast = math::ema_series(closes, params.fast);
    let slow = math::ema_series(closes, params.slow);

    let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal_line = math::ema_series(&macd_line, params.signal);

    (macd_line, signal_line)
}

/// MACD step of the indicator chain; adds [`Column::Macd`] and [`Column::MacdSignal`].
#[derive(Debug, Clone)]
pub struct Macd {
    params: MacdParams,
}

impl Macd {
    pub fn new(params: MacdParams) -> Result<Self, IndicatorError> {
        validate_macd_params(&params)?;
        Ok(Self { params })
    }
}

impl Indicator for Macd {
    fn name(&self) -> &'static str {
        "MACD"
    }

    fn calculate(&self, data: &MarketData) -> MarketData {
        let (macd_line, signal_line) = calculate_macd(&data.closes(), &self.params);
        data.with_column(Column::Macd, macd_line.into_iter().map(Some).collect())
            .with_column(
                Column::MacdSignal,
                signal_line.into_iter().map(Some).collect(),
            )
    }
}
