//! Exit price resolution.

use crate::models::signal::SignalDirection;

/// Exit price of every row: for a buy, the close of the first row at or after
/// it whose RSI rises above `rsi_sell`; for a sell, the first row whose RSI
/// falls below `rsi_buy`. Hold rows and rows with no later crossing get `None`.
///
/// One backward pass carrying the next crossing of each kind.
pub fn exit_prices(
    closes: &[f64],
    rsi: Option<&[Option<f64>]>,
    directions: &[SignalDirection],
    rsi_buy: f64,
    rsi_sell: f64,
) -> Vec<Option<f64>> {
    let mut exits = vec![None; directions.len()];
    let Some(rsi) = rsi else {
        return exits;
    };

    let mut next_overbought: Option<f64> = None;
    let mut next_oversold: Option<f64> = None;

    for row in (0..directions.len()).rev() {
        if let Some(value) = rsi[row] {
            if value > rsi_sell {
                next_overbought = Some(closes[row]);
            }
            if value < rsi_buy {
                next_oversold = Some(closes[row]);
            }
        }

        exits[row] = match directions[row] {
            SignalDirection::Buy => next_overbought,
            SignalDirection::Sell => next_oversold,
            SignalDirection::Hold => None,
        };
    }

    exits
}
