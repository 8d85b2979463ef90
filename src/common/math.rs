//! Numeric series helpers shared by the indicators.

/// Simple moving average of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Rolling simple moving average; the first `period - 1` entries are undefined.
pub fn rolling_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    // Each window is summed afresh so an all-zero window averages to exactly 0.
    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                sma(&values[..=i], period)
            }
        })
        .collect()
}

/// Smoothing factor for an EMA spanning `span` bars.
pub fn ema_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

pub fn ema_from_previous(value: f64, previous: f64, span: usize) -> f64 {
    let alpha = ema_alpha(span);
    alpha * value + (1.0 - alpha) * previous
}

/// Recursive EMA seeded with the first value, no bias adjustment.
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut iter = values.iter();
    if let Some(&first) = iter.next() {
        out.push(first);
        let mut previous = first;
        for &value in iter {
            previous = ema_from_previous(value, previous, span);
            out.push(previous);
        }
    }
    out
}

/// First difference; the first entry has no predecessor and is `None`.
pub fn diff(values: &[f64]) -> Vec<Option<f64>> {
    std::iter::once(None)
        .chain(values.windows(2).map(|pair| Some(pair[1] - pair[0])))
        .take(values.len())
        .collect()
}
