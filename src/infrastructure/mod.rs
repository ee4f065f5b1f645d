//! Infrastructure layer wiring concrete adapters (inference engine, scaler file).

pub mod engines;
pub mod scaler;

pub use engines::OnnxEngine;
pub use scaler::load_scaler;
