//! Generator scenarios over synthetic markets

use crate::fixtures::{choppy_closes, linear_closes, table_from_closes, FOREX_REVERSAL};
use tasignal::config::AssetClassTable;
use tasignal::error::SignalErrorKind;
use tasignal::indicators::{calculate_rsi, Indicator, IndicatorSelection};
use tasignal::models::indicators::{MacdParams, RsiParams};
use tasignal::models::market::AssetClass;
use tasignal::models::signal::SignalDirection;
use tasignal::signals::{DynamicSignalGenerator, MIN_ROWS, OUTPUT_WINDOW};

fn indicators(selection: &str) -> Vec<Box<dyn Indicator>> {
    selection
        .parse::<IndicatorSelection>()
        .unwrap()
        .build(RsiParams::default(), MacdParams::default())
        .unwrap()
}

fn generator() -> DynamicSignalGenerator {
    DynamicSignalGenerator::new(AssetClassTable::default())
}

#[test]
fn test_forex_reversal_buys_at_crossover() {
    let table = table_from_closes(&FOREX_REVERSAL);
    let rows = generator()
        .generate(&table, &indicators("combined"), "EUR/USD", AssetClass::Forex)
        .unwrap();

    // 30 bars, 13 warm-up rows trimmed, newest 10 kept: bars 20..=29.
    assert_eq!(rows.len(), OUTPUT_WINDOW);
    let crossover = &rows[0];
    assert_eq!(crossover.close, FOREX_REVERSAL[20]);
    assert_eq!(crossover.signal, SignalDirection::Buy);
    assert!(crossover.macd.unwrap() > crossover.macd_signal.unwrap());
    assert!(crossover.rsi.unwrap() < 30.0);
    assert!(crossover.confidence > 0.0);
    assert!((crossover.confidence - 2.0 / 3.0).abs() < 1e-6);

    let rsi = calculate_rsi(&FOREX_REVERSAL, 14);
    let first_overbought = (21..FOREX_REVERSAL.len())
        .find(|&i| rsi[i].map_or(false, |v| v > 70.0))
        .unwrap();
    assert_eq!(first_overbought, 22);
    assert_eq!(crossover.exit_price, Some(FOREX_REVERSAL[first_overbought]));
    assert_eq!(crossover.ticker, "EUR/USD");
}

#[test]
fn test_constant_close_reads_overbought_never_nan() {
    let table = table_from_closes(&vec![1.1; 40]);
    let rows = generator()
        .generate(&table, &indicators("combined"), "EURUSD=X", AssetClass::Forex)
        .unwrap();

    for row in &rows {
        let rsi = row.rsi.unwrap();
        assert!(!rsi.is_nan());
        assert_eq!(rsi, 100.0);
        assert_eq!(row.macd, Some(0.0));
        // RSI above 70 and a flat OBV agree on selling.
        assert_eq!(row.signal, SignalDirection::Sell);
        assert!((row.confidence - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(row.exit_price, None);
    }
}

#[test]
fn test_five_bars_are_insufficient() {
    let table = table_from_closes(&[1.0, 1.1, 1.2, 1.1, 1.0]);
    let err = generator()
        .generate(&table, &indicators("combined"), "AAPL", AssetClass::Stocks)
        .unwrap_err();
    assert_eq!(
        err,
        SignalErrorKind::InsufficientData {
            rows: 0,
            required: MIN_ROWS,
        }
    );
}

#[test]
fn test_minimum_row_boundary() {
    // RSI(14) leaves len - 13 complete rows.
    let enough = table_from_closes(&choppy_closes(13 + MIN_ROWS));
    let rows = generator()
        .generate(&enough, &indicators("rsi"), "AAPL", AssetClass::Stocks)
        .unwrap();
    assert_eq!(rows.len(), MIN_ROWS.min(OUTPUT_WINDOW));
    assert_eq!(rows.last().unwrap().close, *choppy_closes(13 + MIN_ROWS).last().unwrap());

    let short = table_from_closes(&choppy_closes(12 + MIN_ROWS));
    assert!(matches!(
        generator().generate(&short, &indicators("rsi"), "AAPL", AssetClass::Stocks),
        Err(SignalErrorKind::InsufficientData { rows: 9, .. })
    ));
}

#[test]
fn test_replay_is_idempotent() {
    let table = table_from_closes(&choppy_closes(120));
    let first = generator()
        .generate(&table, &indicators("combined"), "BTC/USDT", AssetClass::Crypto)
        .unwrap();
    let second = generator()
        .generate(&table, &indicators("combined"), "BTC/USDT", AssetClass::Crypto)
        .unwrap();
    assert_eq!(first, second);
    assert!(table.columns().next().is_none(), "input table must stay raw");
}

#[test]
fn test_confidence_bounded_for_every_asset_class() {
    let table = table_from_closes(&choppy_closes(200));
    for asset_class in AssetClass::ALL {
        for selection in ["combined", "rsi", "rsi,macd", "rsi,obv", "macd,obv"] {
            let rows = generator()
                .generate(&table, &indicators(selection), "X", asset_class)
                .unwrap();
            for row in rows {
                assert!((0.0..=1.0).contains(&row.confidence), "{} {:?}", selection, row);
                if row.signal == SignalDirection::Hold {
                    assert_eq!(row.confidence, 0.0);
                    assert_eq!(row.exit_price, None);
                }
            }
        }
    }
}

#[test]
fn test_single_non_rsi_indicator_only_holds() {
    let table = table_from_closes(&choppy_closes(120));
    for selection in ["macd", "obv"] {
        let rows = generator()
            .generate(&table, &indicators(selection), "X", AssetClass::Stocks)
            .unwrap();
        assert!(rows.iter().all(|row| row.signal == SignalDirection::Hold));
        assert!(rows.iter().all(|row| row.rsi.is_none()));
    }
}

#[test]
fn test_rsi_only_follows_thresholds() {
    let table = table_from_closes(&choppy_closes(120));
    let thresholds = AssetClassTable::default();
    let stocks = thresholds.get(AssetClass::Stocks);
    let rows = generator()
        .generate(&table, &indicators("rsi"), "X", AssetClass::Stocks)
        .unwrap();

    for row in rows {
        let rsi = row.rsi.unwrap();
        let expected = if rsi < stocks.rsi_buy {
            SignalDirection::Buy
        } else if rsi > stocks.rsi_sell {
            SignalDirection::Sell
        } else {
            SignalDirection::Hold
        };
        assert_eq!(row.signal, expected);
        assert!(row.macd.is_none() && row.obv.is_none());
    }
}

#[test]
fn test_rows_are_newest_last() {
    let table = table_from_closes(&linear_closes(50, 100.0, 0.3));
    let rows = generator()
        .generate(&table, &indicators("combined"), "X", AssetClass::Indices)
        .unwrap();
    assert!(rows.windows(2).all(|pair| pair[0].timestamp < pair[1].timestamp));
    assert_eq!(rows.last().unwrap().timestamp, table.candles().last().unwrap().timestamp);
}
