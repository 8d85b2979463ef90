use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("{name} length must be greater than zero")]
    ZeroLength { name: &'static str },

    #[error("MACD fast length ({fast}) must be smaller than slow length ({slow})")]
    FastNotBelowSlow { fast: usize, slow: usize },

    #[error("RSI thresholds must satisfy 0 < buy < sell < 100, got buy={buy} sell={sell}")]
    InvalidThresholds { buy: f64, sell: f64 },

    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("indicator selection is empty")]
    EmptySelection,
}
