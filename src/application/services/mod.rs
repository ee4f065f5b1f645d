//! Service layer orchestrating domain operations and infrastructure adapters.

mod prediction_service;

pub use prediction_service::{InferenceEngine, PredictionService, ServiceConfig};
