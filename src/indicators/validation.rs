use crate::indicators::error::IndicatorError;
use crate::models::indicators::{MacdParams, RsiParams};

pub fn validate_thresholds(buy: f64, sell: f64) -> Result<(), IndicatorError> {
    if buy > 0.0 && buy < sell && sell < 100.0 {
        Ok(())
    } else {
        Err(IndicatorError::InvalidThresholds { buy, sell })
    }
}

pub fn validate_rsi_params(params: &RsiParams) -> Result<(), IndicatorError> {
    if params.length == 0 {
        return Err(IndicatorError::ZeroLength { name: "RSI" });
    }
    validate_thresholds(params.buy_threshold, params.sell_threshold)
}

pub fn validate_macd_params(params: &MacdParams) -> Result<(), IndicatorError> {
    if params.fast == 0 || params.slow == 0 || params.signal == 0 {
        return Err(IndicatorError::ZeroLength { name: "MACD" });
    }
    if params.fast >= params.slow {
        return Err(IndicatorError::FastNotBelowSlow {
            fast: params.fast,
            slow: params.slow,
        });
    }
    Ok(())
}
