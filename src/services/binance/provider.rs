//! Binance klines provider, used for the crypto asset class.

use super::messages::{exchange_pair, parse_kline, RawKline};
use crate::error::SignalErrorKind;
use crate::models::indicators::Candle;
use crate::models::market::{validate_window, AssetClass, Interval, Period};
use crate::models::market_data::MarketData;
use crate::services::market_data::{transport_error, DataProvider};
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Binance caps one klines response at 1000 bars.
const KLINES_LIMIT: usize = 1000;
/// 1y of 1h bars is ~9 pages; anything beyond this is a runaway cursor.
const MAX_PAGES: usize = 60;

#[derive(Clone)]
pub struct BinanceProvider {
    client: Client,
    base_url: String,
}

impl BinanceProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("tasignal/0.1")
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

    async fn fetch_page(
        &self,
        pair: &str,
        interval: Interval,
        start_time: i64,
    ) -> Result<Vec<RawKline>, SignalErrorKind> {
        let url = format!("{}/api/v3/klines", self.base_url.trim_end_matches('/'));
        let limit = KLINES_LIMIT.to_string();
        let start = start_time.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", pair),
                ("interval", interval.as_str()),
                ("startTime", start.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport_error(self.name(), e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let body: String = text.chars().take(200).collect();
            warn!(%pair, %status, %body, "Binance klines request failed");
            return Err(SignalErrorKind::DataUnavailable(format!(
                "Binance API error for {}: {}",
                pair, status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| transport_error(self.name(), format!("parse error: {}", e)))
    }
}

#[async_trait::async_trait]
impl DataProvider for BinanceProvider {
    fn name(&self) -> &'static str {
        "binance"
    }

    async fn fetch(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
        asset_class: AssetClass,
    ) -> Result<MarketData, SignalErrorKind> {
        validate_window(interval, period)?;

        let pair = exchange_pair(symbol);
        let mut since = Utc::now().timestamp_millis() - period.lookback_ms();
        debug!(%symbol, %pair, %asset_class, since, "Fetching Binance klines");

        let mut candles: Vec<Candle> = Vec::new();
        for _ in 0..MAX_PAGES {
            let page = self.fetch_page(&pair, interval, since).await?;
            let full_page = page.len() >= KLINES_LIMIT;

            for raw in &page {
                candles.push(parse_kline(raw)?);
            }

            match candles.last() {
                Some(last) if full_page => since = last.timestamp.timestamp_millis() + 1,
                _ => break,
            }
        }

        if candles.is_empty() {
            return Err(SignalErrorKind::DataUnavailable(format!(
                "no data fetched for {}",
                symbol
            )));
        }

        let data = MarketData::new(candles)?;
        debug!(%symbol, rows = data.len(), "Binance klines normalized");
        Ok(data)
    }
}
