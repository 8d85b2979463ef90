//! Time-indexed OHLCV table with attachable indicator columns.

use crate::error::SignalErrorKind;
use crate::models::indicators::{Candle, Column};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};

/// Immutable OHLCV table, rows in strictly increasing timestamp order.
///
/// Indicators never mutate a table in place: [`MarketData::with_column`]
/// returns a new table, so the caller's copy stays valid for charting.
/// `None` in a derived column marks a row the indicator could not define
/// yet (warm-up).
#[derive(Debug, Clone, PartialEq)]
pub struct MarketData {
    candles: Vec<Candle>,
    columns: BTreeMap<Column, Vec<Option<f64>>>,
}

impl MarketData {
    pub fn new(candles: Vec<Candle>) -> Result<Self, SignalErrorKind> {
        if let Some(pair) = candles
            .windows(2)
            .find(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(SignalErrorKind::SchemaError(format!(
                "timestamps must be strictly increasing ({} followed by {})",
                pair[0].timestamp, pair[1].timestamp
            )));
        }

        Ok(Self {
            candles,
            columns: BTreeMap::new(),
        })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }

    pub fn column(&self, column: Column) -> Option<&[Option<f64>]> {
        self.columns.get(&column).map(|values| values.as_slice())
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains_key(&column)
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.keys().copied()
    }

    /// Value of `column` at `row`, `None` when the column is absent or undefined there.
    pub fn value(&self, column: Column, row: usize) -> Option<f64> {
        self.columns
            .get(&column)
            .and_then(|values| values.get(row).copied().flatten())
    }

    /// Copy of this table with `column` set to `values` (replacing any previous values).
    pub fn with_column(&self, column: Column, values: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(values.len(), self.candles.len());
        let mut derived = self.clone();
        derived.columns.insert(column, values);
        derived
    }

    /// Copy of this table without rows where any derived column is undefined.
    pub fn drop_incomplete(&self) -> Self {
        let keep: Vec<bool> = (0..self.candles.len())
            .map(|row| {
                self.columns
                    .values()
                    .all(|values| values[row].map_or(false, |v| !v.is_nan()))
            })
            .collect();

        let candles = self
            .candles
            .iter()
            .zip(&keep)
            .filter(|(_, keep)| **keep)
            .map(|(candle, _)| *candle)
            .collect();

        let columns = self
            .columns
            .iter()
            .map(|(column, values)| {
                let kept = values
                    .iter()
                    .zip(&keep)
                    .filter(|(_, keep)| **keep)
                    .map(|(value, _)| *value)
                    .collect();
                (*column, kept)
            })
            .collect();

        Self { candles, columns }
    }
}

/// Flat OHLCV columns as delivered by a feed, before validation.
///
/// A `None` column means the feed did not deliver it at all; a `None` cell
/// means the feed had no value for that bar.
#[derive(Debug, Clone, Default)]
pub struct OhlcvColumns {
    pub timestamps: Vec<DateTime<Utc>>,
    pub open: Option<Vec<Option<f64>>>,
    pub high: Option<Vec<Option<f64>>>,
    pub low: Option<Vec<Option<f64>>>,
    pub close: Option<Vec<Option<f64>>>,
    pub volume: Option<Vec<Option<f64>>>,
}

impl OhlcvColumns {
    /// Validates the column set and builds the table.
    ///
    /// Bars with any missing OHLCV cell are skipped. When a timestamp repeats
    /// (feeds re-send the live bar), the first complete bar is kept.
    pub fn into_market_data(self) -> Result<MarketData, SignalErrorKind> {
        let open = require("Open", self.open)?;
        let high = require("High", self.high)?;
        let low = require("Low", self.low)?;
        let close = require("Close", self.close)?;
        let volume = require("Volume", self.volume)?;

        let rows = self.timestamps.len();
        for (name, len) in [
            ("Open", open.len()),
            ("High", high.len()),
            ("Low", low.len()),
            ("Close", close.len()),
            ("Volume", volume.len()),
        ] {
            if len != rows {
                return Err(SignalErrorKind::SchemaError(format!(
                    "column {} has {} values for {} timestamps",
                    name, len, rows
                )));
            }
        }

        let mut seen = HashSet::with_capacity(rows);
        let candles = self
            .timestamps
            .into_iter()
            .enumerate()
            .filter_map(|(i, timestamp)| {
                Some(Candle::new(
                    open[i]?, high[i]?, low[i]?, close[i]?, volume[i]?, timestamp,
                ))
            })
            .filter(|candle| seen.insert(candle.timestamp))
            .collect();

        MarketData::new(candles)
    }
}

fn require(
    name: &str,
    column: Option<Vec<Option<f64>>>,
) -> Result<Vec<Option<f64>>, SignalErrorKind> {
    column.ok_or_else(|| SignalErrorKind::SchemaError(format!("missing required column {}", name)))
}
