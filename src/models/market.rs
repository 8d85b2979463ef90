//! Request vocabulary: asset classes, lookback periods and bar intervals.

use crate::error::SignalErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Stocks,
    Indices,
    Commodities,
    Forex,
    Crypto,
}

impl AssetClass {
    pub const ALL: [AssetClass; 5] = [
        AssetClass::Stocks,
        AssetClass::Indices,
        AssetClass::Commodities,
        AssetClass::Forex,
        AssetClass::Crypto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Stocks => "stocks",
            AssetClass::Indices => "indices",
            AssetClass::Commodities => "commodities",
            AssetClass::Forex => "forex",
            AssetClass::Crypto => "crypto",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = SignalErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stocks" | "stock" => Ok(AssetClass::Stocks),
            "indices" | "index" => Ok(AssetClass::Indices),
            "commodities" | "commodity" => Ok(AssetClass::Commodities),
            "forex" | "fx" => Ok(AssetClass::Forex),
            "crypto" => Ok(AssetClass::Crypto),
            _ => Err(SignalErrorKind::UnsupportedAssetClass(s.to_string())),
        }
    }
}

/// Lookback window requested from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "7d")]
    Days7,
    #[serde(rename = "14d")]
    Days14,
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "1mo")]
    Month1,
    #[serde(rename = "6mo")]
    Months6,
    #[serde(rename = "1y")]
    Year1,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Days7 => "7d",
            Period::Days14 => "14d",
            Period::Days30 => "30d",
            Period::Month1 => "1mo",
            Period::Months6 => "6mo",
            Period::Year1 => "1y",
        }
    }

    /// Exact lookback span used by the exchange feed.
    pub fn lookback_ms(&self) -> i64 {
        match self {
            Period::Days7 => 7 * DAY_MS,
            Period::Days14 => 14 * DAY_MS,
            Period::Days30 | Period::Month1 => 30 * DAY_MS,
            Period::Months6 => 180 * DAY_MS,
            Period::Year1 => 365 * DAY_MS,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = SignalErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7d" => Ok(Period::Days7),
            "14d" => Ok(Period::Days14),
            "30d" => Ok(Period::Days30),
            "1mo" => Ok(Period::Month1),
            "6mo" => Ok(Period::Months6),
            "1y" => Ok(Period::Year1),
            other => Err(SignalErrorKind::InvalidPeriodInterval {
                period: other.to_string(),
                interval: String::new(),
            }),
        }
    }
}

/// Bar width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "1d")]
    Day1,
}

impl Interval {
    pub const ALL: [Interval; 6] = [
        Interval::Day1,
        Interval::Hour1,
        Interval::Minute30,
        Interval::Minute15,
        Interval::Minute5,
        Interval::Minute1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Hour1 => "1h",
            Interval::Day1 => "1d",
        }
    }

    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Interval::Minute1 | Interval::Minute5 | Interval::Minute15 | Interval::Minute30
        )
    }

    /// Periods a provider may be asked for at this bar width.
    pub fn allowed_periods(&self) -> &'static [Period] {
        match self {
            Interval::Minute1 | Interval::Minute5 | Interval::Minute15 | Interval::Minute30 => {
                &[Period::Days7, Period::Days14, Period::Days30]
            }
            Interval::Hour1 => &[Period::Days14, Period::Days30, Period::Months6],
            Interval::Day1 => &[Period::Days30, Period::Months6, Period::Year1],
        }
    }

    pub fn accepts(&self, period: Period) -> bool {
        self.allowed_periods().contains(&period)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = SignalErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1m" => Ok(Interval::Minute1),
            "5m" => Ok(Interval::Minute5),
            "15m" => Ok(Interval::Minute15),
            "30m" => Ok(Interval::Minute30),
            "1h" => Ok(Interval::Hour1),
            "1d" => Ok(Interval::Day1),
            other => Err(SignalErrorKind::InvalidPeriodInterval {
                period: String::new(),
                interval: other.to_string(),
            }),
        }
    }
}

/// Rejects `(interval, period)` pairs outside the allowed table.
pub fn validate_window(interval: Interval, period: Period) -> Result<(), SignalErrorKind> {
    if interval.accepts(period) {
        Ok(())
    } else {
        Err(SignalErrorKind::InvalidPeriodInterval {
            period: period.to_string(),
            interval: interval.to_string(),
        })
    }
}

/// Parses raw period/interval tokens and validates the pair in one step.
pub fn parse_window(interval: &str, period: &str) -> Result<(Interval, Period), SignalErrorKind> {
    let invalid = || SignalErrorKind::InvalidPeriodInterval {
        period: period.to_string(),
        interval: interval.to_string(),
    };
    let parsed_interval = interval.parse::<Interval>().map_err(|_| invalid())?;
    let parsed_period = period.parse::<Period>().map_err(|_| invalid())?;
    validate_window(parsed_interval, parsed_period)?;
    Ok((parsed_interval, parsed_period))
}
