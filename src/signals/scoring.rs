//! Per-row condition derivation, score thresholds and confidence.

use crate::models::indicators::Column;
use crate::models::market_data::MarketData;
use crate::models::signal::SignalDirection;

/// Agreeing conditions needed for a signal before the RSI-only fallback applies.
pub const PRIMARY_THRESHOLD: u8 = 2;
/// Number of conditions each side can score.
pub const MAX_SCORE: u8 = 3;

/// Boolean readings of one row. A condition whose indicator was not
/// computed stays `false`; `obv_trend` is `None` when OBV was not computed,
/// so that its negation does not count toward the sell side either.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowConditions {
    pub rsi_buy: bool,
    pub rsi_sell: bool,
    pub macd_cross: bool,
    pub macd_cross_sell: bool,
    pub obv_trend: Option<bool>,
}

impl RowConditions {
    pub fn buy_score(&self) -> u8 {
        self.rsi_buy as u8 + self.macd_cross as u8 + (self.obv_trend == Some(true)) as u8
    }

    pub fn sell_score(&self) -> u8 {
        self.rsi_sell as u8 + self.macd_cross_sell as u8 + (self.obv_trend == Some(false)) as u8
    }

    /// Primary thresholding, then the single-condition RSI fallback. Buy is
    /// checked first at each stage.
    pub fn direction(&self) -> SignalDirection {
        if self.buy_score() >= PRIMARY_THRESHOLD {
            SignalDirection::Buy
        } else if self.sell_score() >= PRIMARY_THRESHOLD {
            SignalDirection::Sell
        } else if self.rsi_buy {
            SignalDirection::Buy
        } else if self.rsi_sell {
            SignalDirection::Sell
        } else {
            SignalDirection::Hold
        }
    }
}

/// Derives the conditions of every row in an already trimmed table.
pub fn derive_conditions(frame: &MarketData, rsi_buy: f64, rsi_sell: f64) -> Vec<RowConditions> {
    let rsi = frame.column(Column::Rsi);
    let macd = frame.column(Column::Macd).zip(frame.column(Column::MacdSignal));
    let obv = frame.column(Column::Obv);

    (0..frame.len())
        .map(|row| {
            let mut conditions = RowConditions::default();

            if let Some(value) = rsi.and_then(|values| values[row]) {
                conditions.rsi_buy = value < rsi_buy;
                conditions.rsi_sell = value > rsi_sell;
            }

            if let Some((macd_line, signal_line)) = macd {
                if row > 0 {
                    let now = macd_line[row].zip(signal_line[row]);
                    let before = macd_line[row - 1].zip(signal_line[row - 1]);
                    if let (Some((m, s)), Some((pm, ps))) = (now, before) {
                        conditions.macd_cross = m > s && pm <= ps;
                        conditions.macd_cross_sell = m < s && pm >= ps;
                    }
                }
            }

            if let Some(values) = obv {
                let rising = row > 0
                    && matches!((values[row], values[row - 1]), (Some(now), Some(before)) if now > before);
                conditions.obv_trend = Some(rising);
            }

            conditions
        })
        .collect()
}

/// `(score / 3) * (0.5 + 0.5 * depth)`, clamped to `[0, 1]`.
fn blend(score: u8, depth: f64) -> f64 {
    let agreement = score as f64 / MAX_SCORE as f64;
    let depth = depth.max(0.0).min(1.0);
    (agreement * (0.5 + 0.5 * depth)).max(0.0).min(1.0)
}

/// Confidence of a buy: agreement blended with how far RSI sits below `rsi_buy`.
pub fn buy_confidence(score: u8, rsi: Option<f64>, rsi_buy: f64) -> f64 {
    let depth = rsi.map_or(0.0, |value| (rsi_buy - value).max(0.0) / rsi_buy);
    blend(score, depth)
}

/// Mirror of [`buy_confidence`]: how far RSI sits above `rsi_sell`, over the
/// room left above it.
pub fn sell_confidence(score: u8, rsi: Option<f64>, rsi_sell: f64) -> f64 {
    let depth = rsi.map_or(0.0, |value| (value - rsi_sell).max(0.0) / (100.0 - rsi_sell));
    blend(score, depth)
}

pub fn confidence(
    direction: SignalDirection,
    conditions: &RowConditions,
    rsi: Option<f64>,
    rsi_buy: f64,
    rsi_sell: f64,
) -> f64 {
    match direction {
        SignalDirection::Buy => buy_confidence(conditions.buy_score(), rsi, rsi_buy),
        SignalDirection::Sell => sell_confidence(conditions.sell_score(), rsi, rsi_sell),
        SignalDirection::Hold => 0.0,
    }
}
