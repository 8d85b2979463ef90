//! Engine error taxonomy.
//!
//! Lower layers (providers, generator) report a bare [`SignalErrorKind`];
//! the engine attaches the request that produced it before handing the
//! error to the caller.

use crate::indicators::IndicatorError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalErrorKind {
    #[error("period {period} is not available for interval {interval}")]
    InvalidPeriodInterval { period: String, interval: String },

    #[error("market data unavailable: {0}")]
    DataUnavailable(String),

    #[error("market data schema error: {0}")]
    SchemaError(String),

    #[error("insufficient data: {rows} valid rows after indicator warm-up, need {required}")]
    InsufficientData { rows: usize, required: usize },

    #[error("unsupported asset class: {0}")]
    UnsupportedAssetClass(String),

    #[error("invalid indicator parameters: {0}")]
    InvalidParameters(#[from] IndicatorError),
}

impl SignalErrorKind {
    /// Stable snake_case label used for metrics and API payloads.
    pub fn label(&self) -> &'static str {
        match self {
            SignalErrorKind::InvalidPeriodInterval { .. } => "invalid_period_interval",
            SignalErrorKind::DataUnavailable(_) => "data_unavailable",
            SignalErrorKind::SchemaError(_) => "schema_error",
            SignalErrorKind::InsufficientData { .. } => "insufficient_data",
            SignalErrorKind::UnsupportedAssetClass(_) => "unsupported_asset_class",
            SignalErrorKind::InvalidParameters(_) => "invalid_parameters",
        }
    }

    pub fn with_context(self, context: RequestContext) -> SignalError {
        SignalError {
            kind: self,
            context,
        }
    }
}

/// The request tuple an error was produced for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    pub symbol: String,
    pub asset_class: String,
    pub period: String,
    pub interval: String,
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "symbol={} asset_class={} period={} interval={}",
            self.symbol, self.asset_class, self.period, self.interval
        )
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} [{context}]")]
pub struct SignalError {
    pub kind: SignalErrorKind,
    pub context: RequestContext,
}

impl SignalError {
    pub fn kind(&self) -> &SignalErrorKind {
        &self.kind
    }
}
