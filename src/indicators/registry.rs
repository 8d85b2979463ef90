//! Indicator registry and trait system

use crate::indicators::error::IndicatorError;
use crate::indicators::momentum::{Macd, Rsi};
use crate::indicators::validation::{validate_macd_params, validate_rsi_params};
use crate::indicators::volume::Obv;
use crate::models::indicators::{MacdParams, RsiParams};
use crate::models::market_data::MarketData;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trait for all indicators
///
/// `calculate` derives a new table from its input and must not drop rows;
/// rows it cannot define yet carry `None` in its columns.
pub trait Indicator: Send + Sync {
    /// Get the name of the indicator
    fn name(&self) -> &'static str;

    fn calculate(&self, data: &MarketData) -> MarketData;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Rsi,
    Macd,
    Obv,
}

impl IndicatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Macd => "macd",
            IndicatorKind::Obv => "obv",
        }
    }
}

impl FromStr for IndicatorKind {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rsi" => Ok(IndicatorKind::Rsi),
            "macd" => Ok(IndicatorKind::Macd),
            "obv" => Ok(IndicatorKind::Obv),
            other => Err(IndicatorError::UnknownIndicator(other.to_string())),
        }
    }
}

/// Which indicators a request runs, kept in canonical RSI, MACD, OBV order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSelection {
    kinds: Vec<IndicatorKind>,
}

impl IndicatorSelection {
    pub fn combined() -> Self {
        Self {
            kinds: vec![IndicatorKind::Rsi, IndicatorKind::Macd, IndicatorKind::Obv],
        }
    }

    pub fn new(kinds: impl IntoIterator<Item = IndicatorKind>) -> Result<Self, IndicatorError> {
        let mut kinds: Vec<IndicatorKind> = kinds.into_iter().collect();
        kinds.sort();
        kinds.dedup();
        if kinds.is_empty() {
            return Err(IndicatorError::EmptySelection);
        }
        Ok(Self { kinds })
    }

    pub fn kinds(&self) -> &[IndicatorKind] {
        &self.kinds
    }

    pub fn contains(&self, kind: IndicatorKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_combined(&self) -> bool {
        self.kinds.len() == 3
    }

    /// Checks the parameters of the selected indicators without building them.
    pub fn validate(&self, rsi: &RsiParams, macd: &MacdParams) -> Result<(), IndicatorError> {
        if self.contains(IndicatorKind::Rsi) {
            validate_rsi_params(rsi)?;
        }
        if self.contains(IndicatorKind::Macd) {
            validate_macd_params(macd)?;
        }
        Ok(())
    }

    /// Instantiates the selected indicators with the given parameters.
    pub fn build(
        &self,
        rsi: RsiParams,
        macd: MacdParams,
    ) -> Result<Vec<Box<dyn Indicator>>, IndicatorError> {
        self.kinds
            .iter()
            .map(|kind| -> Result<Box<dyn Indicator>, IndicatorError> {
                match kind {
                    IndicatorKind::Rsi => Ok(Box::new(Rsi::new(rsi)?)),
                    IndicatorKind::Macd => Ok(Box::new(Macd::new(macd)?)),
                    IndicatorKind::Obv => Ok(Box::new(Obv)),
                }
            })
            .collect()
    }
}

impl Default for IndicatorSelection {
    fn default() -> Self {
        Self::combined()
    }
}

impl FromStr for IndicatorSelection {
    type Err = IndicatorError;

    /// Accepts `combined` or a comma separated subset of `rsi,macd,obv`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("combined") {
            return Ok(Self::combined());
        }
        let kinds = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<IndicatorKind>, _>>()?;
        Self::new(kinds)
    }
}

impl fmt::Display for IndicatorSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_combined() {
            return f.write_str("combined");
        }
        let names: Vec<&str> = self.kinds.iter().map(IndicatorKind::as_str).collect();
        f.write_str(&names.join(","))
    }
}
