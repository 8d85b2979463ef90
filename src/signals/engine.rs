//! Request-level facade: validate, fetch, generate, summarize.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::{tickers, SignalConfig};
use crate::error::{RequestContext, SignalError, SignalErrorKind};
use crate::indicators::IndicatorSelection;
use crate::metrics::Metrics;
use crate::models::indicators::{MacdParams, RsiParams};
use crate::models::market::{validate_window, AssetClass, Interval, Period};
use crate::models::market_data::MarketData;
use crate::models::signal::SignalResult;
use crate::services::market_data::{with_timeout, ProviderSet};
use crate::services::{BinanceProvider, YahooFinanceProvider};
use crate::signals::signal_generator::DynamicSignalGenerator;

/// One signal computation. `period`/`interval` fall back to the asset-class
/// defaults, `rsi_length`/`macd` to the engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRequest {
    pub symbol: String,
    pub asset_class: AssetClass,
    pub period: Option<Period>,
    pub interval: Option<Interval>,
    pub indicators: IndicatorSelection,
    pub rsi_length: Option<usize>,
    pub macd: Option<MacdParams>,
}

impl SignalRequest {
    pub fn new(symbol: impl Into<String>, asset_class: AssetClass) -> Self {
        Self {
            symbol: symbol.into(),
            asset_class,
            period: None,
            interval: None,
            indicators: IndicatorSelection::combined(),
            rsi_length: None,
            macd: None,
        }
    }

    /// Builds a request from loosely typed input such as query parameters.
    pub fn parse(
        symbol: &str,
        asset_class: &str,
        period: Option<&str>,
        interval: Option<&str>,
        indicators: Option<&str>,
    ) -> Result<Self, SignalError> {
        let context = RequestContext {
            symbol: symbol.to_string(),
            asset_class: asset_class.to_string(),
            period: period.unwrap_or_default().to_string(),
            interval: interval.unwrap_or_default().to_string(),
        };
        let fail = |kind: SignalErrorKind| kind.with_context(context.clone());

        let mut request = Self::new(symbol, asset_class.parse().map_err(fail)?);
        if let Some(period) = period {
            request.period = Some(period.parse().map_err(fail)?);
        }
        if let Some(interval) = interval {
            request.interval = Some(interval.parse().map_err(fail)?);
        }
        if let Some(indicators) = indicators {
            request.indicators = indicators
                .parse()
                .map_err(|e| fail(SignalErrorKind::InvalidParameters(e)))?;
        }
        Ok(request)
    }

    pub fn with_window(mut self, period: Period, interval: Interval) -> Self {
        self.period = Some(period);
        self.interval = Some(interval);
        self
    }

    pub fn with_indicators(mut self, indicators: IndicatorSelection) -> Self {
        self.indicators = indicators;
        self
    }

    pub fn with_rsi_length(mut self, length: usize) -> Self {
        self.rsi_length = Some(length);
        self
    }

    pub fn with_macd(mut self, macd: MacdParams) -> Self {
        self.macd = Some(macd);
        self
    }
}

/// Window and parameters a request resolves to once defaults are applied.
struct ResolvedRequest {
    symbol: String,
    period: Period,
    interval: Interval,
    rsi: RsiParams,
    macd: MacdParams,
    context: RequestContext,
}

pub struct SignalEngine {
    config: SignalConfig,
    providers: ProviderSet,
    generator: DynamicSignalGenerator,
    metrics: Option<Arc<Metrics>>,
}

impl SignalEngine {
    /// Engine backed by the Yahoo Finance and Binance providers named in `config`.
    pub fn new(config: SignalConfig) -> Self {
        let timeout = config.fetch_timeout();
        let providers = ProviderSet::new(
            Arc::new(YahooFinanceProvider::new(config.yahoo_base_url.clone(), timeout)),
            Arc::new(BinanceProvider::new(config.binance_base_url.clone(), timeout)),
        );
        Self::with_providers(config, providers)
    }

    pub fn with_providers(config: SignalConfig, providers: ProviderSet) -> Self {
        Self {
            generator: DynamicSignalGenerator::new(config.asset_classes.clone()),
            config,
            providers,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Fetches market data for the request and scores it.
    ///
    /// Every argument is validated before the provider is contacted.
    pub async fn compute_signal(&self, request: &SignalRequest) -> Result<SignalResult, SignalError> {
        let started = Instant::now();
        let result = self.compute(request).await;

        match &result {
            Ok(signal) => {
                info!(
                    symbol = %signal.ticker,
                    asset_class = %request.asset_class,
                    signal = %signal.signal,
                    confidence = signal.confidence,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Signal computed"
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_signal(request.asset_class, signal.signal);
                }
            }
            Err(error) => {
                warn!(error = %error, kind = error.kind.label(), "Signal computation failed");
                if let Some(metrics) = &self.metrics {
                    metrics.record_error(&error.kind);
                }
            }
        }

        result
    }

    /// Scores an already loaded table, for callers that bring their own data.
    pub fn evaluate(&self, data: &MarketData, request: &SignalRequest) -> Result<SignalResult, SignalError> {
        let resolved = self.resolve(request)?;
        self.score(data, request, &resolved)
    }

    async fn compute(&self, request: &SignalRequest) -> Result<SignalResult, SignalError> {
        let resolved = self.resolve(request)?;
        let provider = self.providers.for_asset_class(request.asset_class);

        let data = with_timeout(
            self.config.fetch_timeout(),
            provider.fetch(
                &resolved.symbol,
                resolved.period,
                resolved.interval,
                request.asset_class,
            ),
        )
        .await
        .map_err(|kind| kind.with_context(resolved.context.clone()))?;

        self.score(&data, request, &resolved)
    }

    fn resolve(&self, request: &SignalRequest) -> Result<ResolvedRequest, SignalError> {
        let defaults = self.config.asset_class(request.asset_class);
        let period = request.period.unwrap_or(defaults.default_period);
        let interval = request.interval.unwrap_or(defaults.default_interval);
        let symbol = tickers::resolve_symbol(request.asset_class, &request.symbol);

        let context = RequestContext {
            symbol: symbol.clone(),
            asset_class: request.asset_class.to_string(),
            period: period.to_string(),
            interval: interval.to_string(),
        };

        validate_window(interval, period).map_err(|kind| kind.with_context(context.clone()))?;

        let rsi = RsiParams {
            length: request.rsi_length.unwrap_or(self.config.rsi_length),
            buy_threshold: defaults.rsi_buy,
            sell_threshold: defaults.rsi_sell,
        };
        let macd = request.macd.unwrap_or(self.config.macd);
        request
            .indicators
            .validate(&rsi, &macd)
            .map_err(|e| SignalErrorKind::from(e).with_context(context.clone()))?;

        Ok(ResolvedRequest {
            symbol,
            period,
            interval,
            rsi,
            macd,
            context,
        })
    }

    fn score(
        &self,
        data: &MarketData,
        request: &SignalRequest,
        resolved: &ResolvedRequest,
    ) -> Result<SignalResult, SignalError> {
        let fail = |kind: SignalErrorKind| kind.with_context(resolved.context.clone());

        let indicators = request
            .indicators
            .build(resolved.rsi, resolved.macd)
            .map_err(|e| fail(e.into()))?;
        let rows = self
            .generator
            .generate(data, &indicators, &resolved.symbol, request.asset_class)
            .map_err(fail)?;

        Ok(SignalResult::from_rows(
            rows,
            &resolved.symbol,
            request.asset_class,
            resolved.period,
            resolved.interval,
        ))
    }
}
