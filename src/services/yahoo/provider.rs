//! Yahoo Finance chart API provider for stocks, indices, commodities and forex.

use super::messages::ChartResponse;
use crate::error::SignalErrorKind;
use crate::models::market::{validate_window, AssetClass, Interval, Period};
use crate::models::market_data::MarketData;
use crate::services::market_data::{transport_error, DataProvider};
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub struct YahooFinanceProvider {
    client: Client,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Chart URL covering `period` back from `now_secs`.
    fn chart_url(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
        now_secs: i64,
    ) -> Result<Url, SignalErrorKind> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| transport_error(self.name(), format!("bad base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| transport_error(self.name(), "base url cannot take a path"))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);

        let start = now_secs - period.lookback_ms() / 1000;
        url.query_pairs_mut()
            .append_pair("period1", &start.to_string())
            .append_pair("period2", &now_secs.to_string())
            .append_pair("interval", interval.as_str())
            .append_pair("includePrePost", "false");
        Ok(url)
    }
}

#[async_trait::async_trait]
impl DataProvider for YahooFinanceProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
        asset_class: AssetClass,
    ) -> Result<MarketData, SignalErrorKind> {
        validate_window(interval, period)?;

        let url = self.chart_url(symbol, period, interval, Utc::now().timestamp())?;
        debug!(%symbol, %asset_class, %url, "Fetching Yahoo Finance chart");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(self.name(), e))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%symbol, %status, "Yahoo Finance returned an error status");
            return Err(SignalErrorKind::DataUnavailable(format!(
                "Yahoo API error for {}: {}",
                symbol, status
            )));
        }

        let chart: ChartResponse = response
            .json()
            .await
            .map_err(|e| transport_error(self.name(), format!("parse error: {}", e)))?;

        let data = chart.into_market_data(symbol)?;
        debug!(%symbol, rows = data.len(), "Yahoo Finance chart normalized");
        Ok(data)
    }
}
