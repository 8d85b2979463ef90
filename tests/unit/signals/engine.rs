//! Unit tests for the signal engine facade

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tasignal::config::SignalConfig;
use tasignal::error::SignalErrorKind;
use tasignal::indicators::IndicatorError;
use tasignal::metrics::Metrics;
use tasignal::models::indicators::MacdParams;
use tasignal::models::market::{AssetClass, Interval, Period};
use tasignal::models::market_data::MarketData;
use tasignal::models::signal::SignalDirection;
use tasignal::services::{DataProvider, ProviderSet};
use tasignal::signals::{SignalEngine, SignalRequest};

use crate::fixtures::{table_from_closes, FOREX_REVERSAL};

/// Serves a fixed table and records what it was asked for.
struct StubProvider {
    name: &'static str,
    closes: Vec<f64>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_symbol: std::sync::Mutex<Option<String>>,
}

impl StubProvider {
    fn new(name: &'static str, closes: &[f64]) -> Arc<Self> {
        Arc::new(Self {
            name,
            closes: closes.to_vec(),
            delay: None,
            calls: AtomicUsize::new(0),
            last_symbol: std::sync::Mutex::new(None),
        })
    }

    fn slow(name: &'static str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name,
            closes: FOREX_REVERSAL.to_vec(),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
            last_symbol: std::sync::Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataProvider for StubProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(
        &self,
        symbol: &str,
        _period: Period,
        _interval: Interval,
        _asset_class: AssetClass,
    ) -> Result<MarketData, SignalErrorKind> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_symbol.lock().unwrap() = Some(symbol.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(table_from_closes(&self.closes))
    }
}

fn engine_with(general: Arc<StubProvider>, exchange: Arc<StubProvider>) -> SignalEngine {
    SignalEngine::with_providers(SignalConfig::default(), ProviderSet::new(general, exchange))
}

#[test]
fn test_request_parse_defaults() {
    let request = SignalRequest::parse("EUR/USD", "forex", None, None, None).unwrap();
    assert_eq!(request.asset_class, AssetClass::Forex);
    assert_eq!(request.period, None);
    assert!(request.indicators.is_combined());
}

#[test]
fn test_request_parse_rejects_unknown_asset_class() {
    let err = SignalRequest::parse("AAPL", "bonds", Some("6mo"), Some("1d"), None).unwrap_err();
    assert_eq!(err.kind, SignalErrorKind::UnsupportedAssetClass("bonds".to_string()));
    assert_eq!(err.context.symbol, "AAPL");
    assert_eq!(err.context.period, "6mo");
}

#[test]
fn test_request_parse_rejects_unknown_indicator() {
    let err = SignalRequest::parse("AAPL", "stocks", None, None, Some("rsi,vwap")).unwrap_err();
    assert_eq!(
        err.kind,
        SignalErrorKind::InvalidParameters(IndicatorError::UnknownIndicator("vwap".to_string()))
    );
}

#[test]
fn test_invalid_window_fails_before_fetch() {
    let general = StubProvider::new("general", &FOREX_REVERSAL);
    let exchange = StubProvider::new("exchange", &FOREX_REVERSAL);
    let engine = engine_with(general.clone(), exchange.clone());

    let request = SignalRequest::new("BTC/USDT", AssetClass::Crypto).with_window(Period::Year1, Interval::Minute1);
    let err = tokio_test::block_on(engine.compute_signal(&request)).unwrap_err();

    assert!(matches!(err.kind, SignalErrorKind::InvalidPeriodInterval { .. }));
    assert_eq!(err.context.interval, "1m");
    assert_eq!(err.context.period, "1y");
    assert_eq!(general.calls() + exchange.calls(), 0);
}

#[test]
fn test_invalid_parameters_fail_before_fetch() {
    let general = StubProvider::new("general", &FOREX_REVERSAL);
    let exchange = StubProvider::new("exchange", &FOREX_REVERSAL);
    let engine = engine_with(general.clone(), exchange);

    let request = SignalRequest::new("AAPL", AssetClass::Stocks).with_macd(MacdParams {
        fast: 26,
        slow: 12,
        signal: 9,
    });
    let err = tokio_test::block_on(engine.compute_signal(&request)).unwrap_err();
    assert!(matches!(err.kind, SignalErrorKind::InvalidParameters(_)));
    assert_eq!(general.calls(), 0);

    let request = SignalRequest::new("AAPL", AssetClass::Stocks).with_rsi_length(0);
    let err = tokio_test::block_on(engine.compute_signal(&request)).unwrap_err();
    assert!(matches!(err.kind, SignalErrorKind::InvalidParameters(IndicatorError::ZeroLength { .. })));
}

#[tokio::test]
async fn test_forex_routes_to_general_provider_with_resolved_symbol() {
    let general = StubProvider::new("general", &FOREX_REVERSAL);
    let exchange = StubProvider::new("exchange", &FOREX_REVERSAL);
    let metrics = Arc::new(Metrics::new().unwrap());
    let engine = engine_with(general.clone(), exchange.clone()).with_metrics(metrics.clone());

    let request = SignalRequest::new("EUR/USD", AssetClass::Forex);
    let result = engine.compute_signal(&request).await.unwrap();

    assert_eq!(general.calls(), 1);
    assert_eq!(exchange.calls(), 0);
    assert_eq!(general.last_symbol.lock().unwrap().as_deref(), Some("EURUSD=X"));
    assert_eq!(result.ticker, "EURUSD=X");
    assert_eq!((result.period, result.interval), (Period::Days30, Interval::Hour1));

    // Newest bar of the reversal is deep in overbought territory.
    assert_eq!(result.signal, SignalDirection::Sell);
    assert_eq!(result.entry_price, Some(FOREX_REVERSAL[29]));
    assert_eq!(result.exit_price, None);
    assert_eq!(result.rows.len(), 10);
    assert_eq!(result.rows[0].signal, SignalDirection::Buy);

    let exported = metrics.export().unwrap();
    assert!(exported.contains("signals_computed_total{asset_class=\"forex\",signal=\"Sell\"} 1"));
}

#[tokio::test]
async fn test_crypto_routes_to_exchange_provider() {
    let general = StubProvider::new("general", &FOREX_REVERSAL);
    let exchange = StubProvider::new("exchange", &FOREX_REVERSAL);
    let engine = engine_with(general.clone(), exchange.clone());

    engine
        .compute_signal(&SignalRequest::new("BTC/USDT", AssetClass::Crypto))
        .await
        .unwrap();
    assert_eq!(exchange.calls(), 1);
    assert_eq!(general.calls(), 0);
}

#[tokio::test]
async fn test_short_history_reports_insufficient_data_with_context() {
    let general = StubProvider::new("general", &[1.0, 1.1, 1.2, 1.1, 1.0]);
    let exchange = StubProvider::new("exchange", &[]);
    let metrics = Arc::new(Metrics::new().unwrap());
    let engine = engine_with(general, exchange).with_metrics(metrics.clone());

    let err = engine
        .compute_signal(&SignalRequest::new("AAPL", AssetClass::Stocks))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, SignalErrorKind::InsufficientData { rows: 0, required: 10 }));
    assert_eq!(err.context.symbol, "AAPL");
    assert_eq!(err.context.period, "6mo");
    assert_eq!(err.context.interval, "1d");
    assert!(metrics
        .export()
        .unwrap()
        .contains("signal_errors_total{kind=\"insufficient_data\"} 1"));
}

#[tokio::test]
async fn test_slow_provider_times_out_as_unavailable() {
    let general = StubProvider::slow("general", Duration::from_secs(30));
    let exchange = StubProvider::new("exchange", &FOREX_REVERSAL);
    let config = SignalConfig {
        fetch_timeout_secs: 1,
        ..SignalConfig::default()
    };
    let engine = SignalEngine::with_providers(config, ProviderSet::new(general, exchange));

    let err = engine
        .compute_signal(&SignalRequest::new("AAPL", AssetClass::Stocks))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, SignalErrorKind::DataUnavailable(_)));
}

#[test]
fn test_evaluate_scores_supplied_table() {
    let engine = engine_with(
        StubProvider::new("general", &[]),
        StubProvider::new("exchange", &[]),
    );
    let request = SignalRequest::new("EUR/USD", AssetClass::Forex);
    let result = engine
        .evaluate(&table_from_closes(&FOREX_REVERSAL), &request)
        .unwrap();
    assert_eq!(result.rows[0].exit_price, Some(1.19));
}
