//! Unit tests for engine configuration

use tasignal::config::{tickers, AssetClassConfig, ConfigError, SignalConfig};
use tasignal::indicators::IndicatorError;
use tasignal::models::market::{AssetClass, Interval, Period};

#[test]
fn test_default_table() {
    let config = SignalConfig::default();
    let stocks = config.asset_class(AssetClass::Stocks);
    assert_eq!((stocks.rsi_buy, stocks.rsi_sell), (40.0, 60.0));
    assert_eq!((stocks.default_period, stocks.default_interval), (Period::Months6, Interval::Day1));

    let commodities = config.asset_class(AssetClass::Commodities);
    assert_eq!((commodities.rsi_buy, commodities.rsi_sell), (35.0, 65.0));

    let crypto = config.asset_class(AssetClass::Crypto);
    assert_eq!((crypto.rsi_buy, crypto.rsi_sell), (30.0, 70.0));
    assert_eq!((crypto.default_period, crypto.default_interval), (Period::Days30, Interval::Hour1));

    assert!(config.validate().is_ok());
    assert_eq!(config.fetch_timeout().as_secs(), 15);
}

#[test]
fn test_with_thresholds_overrides_one_class() {
    let config = SignalConfig::default()
        .with_thresholds(AssetClass::Forex, 25.0, 75.0)
        .unwrap();
    assert_eq!(config.asset_class(AssetClass::Forex).rsi_buy, 25.0);
    assert_eq!(config.asset_class(AssetClass::Crypto).rsi_buy, 30.0);
}

#[test]
fn test_with_thresholds_rejects_inverted_pair() {
    let err = SignalConfig::default()
        .with_thresholds(AssetClass::Stocks, 60.0, 40.0)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidThresholds {
            asset_class: AssetClass::Stocks,
            source: IndicatorError::InvalidThresholds { .. },
        }
    ));
}

#[test]
fn test_validate_rejects_unreachable_default_window() {
    let mut config = SignalConfig::default();
    config.asset_classes.forex = AssetClassConfig::new(30.0, 70.0, Period::Year1, Interval::Minute5);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidDefaultWindow { asset_class: AssetClass::Forex, .. })
    ));
}

#[test]
fn test_validate_rejects_bad_lengths() {
    let mut config = SignalConfig::default();
    config.rsi_length = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Indicator(IndicatorError::ZeroLength { name: "RSI" }))
    ));

    let mut config = SignalConfig::default();
    config.macd.fast = 30;
    assert!(config.validate().is_err());

    let mut config = SignalConfig::default();
    config.fetch_timeout_secs = 0;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
}

#[test]
fn test_from_env_applies_overrides() {
    std::env::set_var("RSI_BUY_COMMODITIES", "33");
    std::env::set_var("DEFAULT_INTERVAL_COMMODITIES", "1h");
    std::env::set_var("DEFAULT_PERIOD_COMMODITIES", "30d");
    let config = SignalConfig::from_env();
    std::env::remove_var("RSI_BUY_COMMODITIES");
    std::env::remove_var("DEFAULT_INTERVAL_COMMODITIES");
    std::env::remove_var("DEFAULT_PERIOD_COMMODITIES");

    let config = config.unwrap();
    let commodities = config.asset_class(AssetClass::Commodities);
    assert_eq!(commodities.rsi_buy, 33.0);
    assert_eq!(commodities.default_interval, Interval::Hour1);
    assert_eq!(commodities.default_period, Period::Days30);
}

#[test]
fn test_ticker_catalogue_covers_every_class() {
    for asset_class in AssetClass::ALL {
        assert!(!tickers::catalogue(asset_class).is_empty());
    }
    assert_eq!(tickers::resolve_symbol(AssetClass::Commodities, "OIL"), "CL=F");
}
