pub mod error;
pub mod registry;
pub mod validation;

pub mod momentum;
pub mod volume;

pub use error::IndicatorError;
pub use momentum::{calculate_macd, calculate_rsi, Macd, Rsi};
pub use registry::*;
pub use validation::*;
pub use volume::{calculate_obv, Obv};
