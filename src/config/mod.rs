//! Engine configuration: per-asset-class thresholds and provider settings.

pub mod tickers;

use crate::indicators::validation::{validate_macd_params, validate_thresholds};
use crate::indicators::IndicatorError;
use crate::models::indicators::MacdParams;
use crate::models::market::{AssetClass, Interval, Period};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_BINANCE_BASE_URL: &str = "https://api.binance.com";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_RSI_LENGTH: usize = 14;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("{asset_class}: {source}")]
    InvalidThresholds {
        asset_class: AssetClass,
        #[source]
        source: IndicatorError,
    },

    #[error("{asset_class}: default period {period} is not available for interval {interval}")]
    InvalidDefaultWindow {
        asset_class: AssetClass,
        period: Period,
        interval: Interval,
    },

    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

/// Get the deployment environment (`ENVIRONMENT`, defaults to `sandbox`).
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// Per-asset-class reading of RSI and default request window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetClassConfig {
    pub rsi_buy: f64,
    pub rsi_sell: f64,
    pub default_period: Period,
    pub default_interval: Interval,
}

impl AssetClassConfig {
    pub fn new(rsi_buy: f64, rsi_sell: f64, default_period: Period, default_interval: Interval) -> Self {
        Self {
            rsi_buy,
            rsi_sell,
            default_period,
            default_interval,
        }
    }

    pub fn default_for(asset_class: AssetClass) -> Self {
        match asset_class {
            AssetClass::Stocks | AssetClass::Indices => {
                Self::new(40.0, 60.0, Period::Months6, Interval::Day1)
            }
            AssetClass::Commodities => Self::new(35.0, 65.0, Period::Months6, Interval::Day1),
            AssetClass::Forex | AssetClass::Crypto => {
                Self::new(30.0, 70.0, Period::Days30, Interval::Hour1)
            }
        }
    }
}

/// Threshold table keyed by asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClassTable {
    pub stocks: AssetClassConfig,
    pub indices: AssetClassConfig,
    pub commodities: AssetClassConfig,
    pub forex: AssetClassConfig,
    pub crypto: AssetClassConfig,
}

impl AssetClassTable {
    pub fn get(&self, asset_class: AssetClass) -> &AssetClassConfig {
        match asset_class {
            AssetClass::Stocks => &self.stocks,
            AssetClass::Indices => &self.indices,
            AssetClass::Commodities => &self.commodities,
            AssetClass::Forex => &self.forex,
            AssetClass::Crypto => &self.crypto,
        }
    }

    pub fn get_mut(&mut self, asset_class: AssetClass) -> &mut AssetClassConfig {
        match asset_class {
            AssetClass::Stocks => &mut self.stocks,
            AssetClass::Indices => &mut self.indices,
            AssetClass::Commodities => &mut self.commodities,
            AssetClass::Forex => &mut self.forex,
            AssetClass::Crypto => &mut self.crypto,
        }
    }
}

impl Default for AssetClassTable {
    fn default() -> Self {
        Self {
            stocks: AssetClassConfig::default_for(AssetClass::Stocks),
            indices: AssetClassConfig::default_for(AssetClass::Indices),
            commodities: AssetClassConfig::default_for(AssetClass::Commodities),
            forex: AssetClassConfig::default_for(AssetClass::Forex),
            crypto: AssetClassConfig::default_for(AssetClass::Crypto),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    pub asset_classes: AssetClassTable,
    pub rsi_length: usize,
    pub macd: MacdParams,
    pub fetch_timeout_secs: u64,
    pub yahoo_base_url: String,
    pub binance_base_url: String,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            asset_classes: AssetClassTable::default(),
            rsi_length: DEFAULT_RSI_LENGTH,
            macd: MacdParams::default(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            binance_base_url: DEFAULT_BINANCE_BASE_URL.to_string(),
        }
    }
}

impl SignalConfig {
    /// Defaults overridden by the environment (a `.env` file is loaded first if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        for asset_class in AssetClass::ALL {
            let suffix = asset_class.as_str().to_ascii_uppercase();
            let entry = config.asset_classes.get_mut(asset_class);
            if let Some(value) = env_parse::<f64>(&format!("RSI_BUY_{}", suffix))? {
                entry.rsi_buy = value;
            }
            if let Some(value) = env_parse::<f64>(&format!("RSI_SELL_{}", suffix))? {
                entry.rsi_sell = value;
            }
            if let Some(value) = env_parse::<Period>(&format!("DEFAULT_PERIOD_{}", suffix))? {
                entry.default_period = value;
            }
            if let Some(value) = env_parse::<Interval>(&format!("DEFAULT_INTERVAL_{}", suffix))? {
                entry.default_interval = value;
            }
        }

        if let Some(value) = env_parse("RSI_LENGTH")? {
            config.rsi_length = value;
        }
        if let Some(value) = env_parse("MACD_FAST")? {
            config.macd.fast = value;
        }
        if let Some(value) = env_parse("MACD_SLOW")? {
            config.macd.slow = value;
        }
        if let Some(value) = env_parse("MACD_SIGNAL")? {
            config.macd.signal = value;
        }
        if let Some(value) = env_parse("FETCH_TIMEOUT_SECS")? {
            config.fetch_timeout_secs = value;
        }
        if let Ok(url) = env::var("YAHOO_BASE_URL") {
            config.yahoo_base_url = url;
        }
        if let Ok(url) = env::var("BINANCE_BASE_URL") {
            config.binance_base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for asset_class in AssetClass::ALL {
            let entry = self.asset_classes.get(asset_class);
            validate_thresholds(entry.rsi_buy, entry.rsi_sell).map_err(|source| {
                ConfigError::InvalidThresholds {
                    asset_class,
                    source,
                }
            })?;
            if !entry.default_interval.accepts(entry.default_period) {
                return Err(ConfigError::InvalidDefaultWindow {
                    asset_class,
                    period: entry.default_period,
                    interval: entry.default_interval,
                });
            }
        }
        if self.rsi_length == 0 {
            return Err(IndicatorError::ZeroLength { name: "RSI" }.into());
        }
        validate_macd_params(&self.macd)?;
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "FETCH_TIMEOUT_SECS".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn asset_class(&self, asset_class: AssetClass) -> &AssetClassConfig {
        self.asset_classes.get(asset_class)
    }

    /// Replace the thresholds for one asset class, keeping the table valid.
    pub fn with_thresholds(
        mut self,
        asset_class: AssetClass,
        rsi_buy: f64,
        rsi_sell: f64,
    ) -> Result<Self, ConfigError> {
        validate_thresholds(rsi_buy, rsi_sell).map_err(|source| ConfigError::InvalidThresholds {
            asset_class,
            source,
        })?;
        let entry = self.asset_classes.get_mut(asset_class);
        entry.rsi_buy = rsi_buy;
        entry.rsi_sell = rsi_sell;
        Ok(self)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// HTTP port for the API server (`PORT`, defaults to 8080).
pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}
