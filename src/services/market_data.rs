//! Market data provider interface and provider selection.

use crate::error::SignalErrorKind;
use crate::models::market::{AssetClass, Interval, Period};
use crate::models::market_data::MarketData;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

#[async_trait::async_trait]
pub trait DataProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Fetch a window of bars for `symbol`.
    ///
    /// Implementations validate `(interval, period)` before touching the
    /// network and report transport failures as `DataUnavailable`.
    async fn fetch(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
        asset_class: AssetClass,
    ) -> Result<MarketData, SignalErrorKind>;
}

/// The two feeds the engine routes between: the general market feed for
/// everything except crypto, and the exchange feed for crypto.
#[derive(Clone)]
pub struct ProviderSet {
    general: Arc<dyn DataProvider>,
    exchange: Arc<dyn DataProvider>,
}

impl ProviderSet {
    pub fn new(general: Arc<dyn DataProvider>, exchange: Arc<dyn DataProvider>) -> Self {
        Self { general, exchange }
    }

    pub fn for_asset_class(&self, asset_class: AssetClass) -> &dyn DataProvider {
        match asset_class {
            AssetClass::Crypto => self.exchange.as_ref(),
            AssetClass::Stocks
            | AssetClass::Indices
            | AssetClass::Commodities
            | AssetClass::Forex => self.general.as_ref(),
        }
    }
}

/// Bound a provider call; an elapsed deadline is reported as `DataUnavailable`.
pub async fn with_timeout<T, F>(timeout: Duration, fut: F) -> Result<T, SignalErrorKind>
where
    F: Future<Output = Result<T, SignalErrorKind>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(SignalErrorKind::DataUnavailable(format!(
            "request timed out after {}s",
            timeout.as_secs()
        ))),
    }
}

/// Maps a transport-level error to `DataUnavailable`.
pub fn transport_error(provider: &str, err: impl std::fmt::Display) -> SignalErrorKind {
    SignalErrorKind::DataUnavailable(format!("{} request failed: {}", provider, err))
}
