//! Signal fusion and the request-level engine.

pub mod engine;
pub mod exits;
pub mod scoring;
pub mod signal_generator;

pub use engine::{SignalEngine, SignalRequest};
pub use exits::exit_prices;
pub use scoring::*;
pub use signal_generator::{DynamicSignalGenerator, MIN_ROWS, OUTPUT_WINDOW};
