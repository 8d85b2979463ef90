//! Yahoo Finance chart API payloads.

use crate::error::SignalErrorKind;
use crate::models::market_data::{MarketData, OhlcvColumns};
use chrono::DateTime;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub timestamp: Option<Vec<i64>>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Quote {
    pub open: Option<Vec<Option<f64>>>,
    pub high: Option<Vec<Option<f64>>>,
    pub low: Option<Vec<Option<f64>>>,
    pub close: Option<Vec<Option<f64>>>,
    pub volume: Option<Vec<Option<f64>>>,
}

impl ChartResponse {
    /// Flattens `chart.result[0].indicators.quote[0]` into an OHLCV table.
    pub fn into_market_data(self, symbol: &str) -> Result<MarketData, SignalErrorKind> {
        if let Some(error) = self.chart.error {
            return Err(SignalErrorKind::DataUnavailable(format!(
                "Yahoo API error for {}: {} - {}",
                symbol, error.code, error.description
            )));
        }

        let result = self
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| no_data(symbol))?;

        let timestamps = result.timestamp.unwrap_or_default();
        if timestamps.is_empty() {
            return Err(no_data(symbol));
        }

        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| {
                SignalErrorKind::SchemaError(format!("no quote block in response for {}", symbol))
            })?;

        let timestamps = timestamps
            .into_iter()
            .map(|secs| {
                DateTime::from_timestamp(secs, 0).ok_or_else(|| {
                    SignalErrorKind::SchemaError(format!("invalid timestamp {}", secs))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let data = OhlcvColumns {
            timestamps,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            close: quote.close,
            volume: quote.volume,
        }
        .into_market_data()?;

        if data.is_empty() {
            return Err(no_data(symbol));
        }
        Ok(data)
    }
}

fn no_data(symbol: &str) -> SignalErrorKind {
    SignalErrorKind::DataUnavailable(format!("no data fetched for {}", symbol))
}
