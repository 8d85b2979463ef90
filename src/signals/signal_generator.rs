use crate::config::AssetClassTable;
use crate::error::SignalErrorKind;
use crate::indicators::Indicator;
use crate::models::indicators::Column;
use crate::models::market::AssetClass;
use crate::models::market_data::MarketData;
use crate::models::signal::{SignalDirection, SignalRow};
use crate::signals::exits::exit_prices;
use crate::signals::scoring::{confidence, derive_conditions, RowConditions};
use tracing::debug;

/// Fewest complete rows a table may have after indicator warm-up.
pub const MIN_ROWS: usize = 10;
/// Number of newest rows returned by [`DynamicSignalGenerator::generate`].
pub const OUTPUT_WINDOW: usize = 10;

/// Fuses RSI, MACD and OBV readings into per-row Buy/Sell/Hold signals using
/// asset-class specific RSI thresholds.
#[derive(Debug, Clone, Default)]
pub struct DynamicSignalGenerator {
    asset_classes: AssetClassTable,
}

impl DynamicSignalGenerator {
    pub fn new(asset_classes: AssetClassTable) -> Self {
        Self { asset_classes }
    }

    /// Runs `indicators` over `data`, scores every complete row and returns
    /// the newest [`OUTPUT_WINDOW`] rows, oldest first.
    pub fn generate(
        &self,
        data: &MarketData,
        indicators: &[Box<dyn Indicator>],
        symbol: &str,
        asset_class: AssetClass,
    ) -> Result<Vec<SignalRow>, SignalErrorKind> {
        let thresholds = self.asset_classes.get(asset_class);
        let (rsi_buy, rsi_sell) = (thresholds.rsi_buy, thresholds.rsi_sell);

        let frame = indicators
            .iter()
            .fold(data.clone(), |frame, indicator| indicator.calculate(&frame))
            .drop_incomplete();

        if frame.len() < MIN_ROWS {
            return Err(SignalErrorKind::InsufficientData {
                rows: frame.len(),
                required: MIN_ROWS,
            });
        }

        let conditions = derive_conditions(&frame, rsi_buy, rsi_sell);
        let directions: Vec<SignalDirection> =
            conditions.iter().map(RowConditions::direction).collect();
        let closes = frame.closes();
        let exits = exit_prices(
            &closes,
            frame.column(Column::Rsi),
            &directions,
            rsi_buy,
            rsi_sell,
        );

        log_diagnostics(&frame, indicators, &conditions, &directions, symbol);

        let start = frame.len().saturating_sub(OUTPUT_WINDOW);
        let rows = (start..frame.len())
            .map(|row| {
                let rsi = frame.value(Column::Rsi, row);
                SignalRow {
                    timestamp: frame.candles()[row].timestamp,
                    signal: directions[row],
                    confidence: confidence(
                        directions[row],
                        &conditions[row],
                        rsi,
                        rsi_buy,
                        rsi_sell,
                    ),
                    ticker: symbol.to_string(),
                    rsi,
                    macd: frame.value(Column::Macd, row),
                    macd_signal: frame.value(Column::MacdSignal, row),
                    obv: frame.value(Column::Obv, row),
                    close: closes[row],
                    exit_price: exits[row],
                }
            })
            .collect();

        Ok(rows)
    }
}

fn log_diagnostics(
    frame: &MarketData,
    indicators: &[Box<dyn Indicator>],
    conditions: &[RowConditions],
    directions: &[SignalDirection],
    symbol: &str,
) {
    let names: Vec<&str> = indicators.iter().map(|indicator| indicator.name()).collect();
    let rsi_range = frame.column(Column::Rsi).map(|values| {
        values
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            })
    });
    let bullish_crosses = conditions.iter().filter(|c| c.macd_cross).count();
    let bearish_crosses = conditions.iter().filter(|c| c.macd_cross_sell).count();
    let buys = directions.iter().filter(|d| **d == SignalDirection::Buy).count();
    let sells = directions.iter().filter(|d| **d == SignalDirection::Sell).count();

    debug!(
        %symbol,
        indicators = %names.join(","),
        rows = frame.len(),
        rsi_min = rsi_range.map(|r| r.0),
        rsi_max = rsi_range.map(|r| r.1),
        bullish_crosses,
        bearish_crosses,
        buys,
        sells,
        "Indicator diagnostics"
    );
}
