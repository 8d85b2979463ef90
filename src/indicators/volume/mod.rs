//! Volume indicators: OBV

pub mod obv;

pub use obv::*;
