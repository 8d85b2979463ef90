//! RSI (Relative Strength Index) indicator

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::registry::Indicator;
use crate::indicators::validation::validate_rsi_params;
use crate::models::indicators::{Column, RsiParams};
use crate::models::market_data::MarketData;

/// Calculate the RSI series over `closes`
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = SMA(gains, length) / SMA(losses, length)
///
/// The first `length - 1` entries are undefined. A window without losses
/// saturates at 100, including a flat window.
pub fn calculate_rsi(closes: &[f64], length: usize) -> Vec<Option<f64>> {
    let changes = math::diff(closes);
    let gains: Vec<f64> = changes
        .iter()
        .map(|change| change.filter(|c| *c > 0.0).unwrap_or(0.0))
        .collect();
    let losses: Vec<f64> = changes
        .iter()
        .map(|change| change.filter(|c| *c < 0.0).map_or(0.0, f64::abs))
        .collect();

    let avg_gains = math::rolling_sma(&gains, length);
    let avg_losses = math::rolling_sma(&losses, length);

    avg_gains
        .into_iter()
        .zip(avg_losses)
        .map(|(avg_gain, avg_loss)| match (avg_gain, avg_loss) {
            (Some(_), Some(loss)) if loss == 0.0 => Some(100.0),
            (Some(gain), Some(loss)) => Some(100.0 - (100.0 / (1.0 + gain / loss))),
            _ => None,
        })
        .collect()
}

/// RSI step of the indicator chain; adds [`Column::Rsi`].
#[derive(Debug, Clone)]
pub struct Rsi {
    params: RsiParams,
}

impl Rsi {
    pub fn new(params: RsiParams) -> Result<Self, IndicatorError> {
        validate_rsi_params(&params)?;
        Ok(Self { params })
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &'static str {
        "RSI"
    }

    fn calculate(&self, data: &MarketData) -> MarketData {
        let rsi = calculate_rsi(&data.closes(), self.params.length);
        data.with_column(Column::Rsi, rsi)
    }
}
