use std::sync::Arc;

use chrono::Utc;

use crate::{
    application::dtos::{HealthStatusResponse, PredictRequest, PredictResponse},
    domain::{DomainError, NormalizationParameters},
};

/// High level configuration shared by the service and its adapters.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub currency: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            currency: "₱".into(),
        }
    }
}

impl ServiceConfig {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }
}

/// Abstraction over any inference runtime able to evaluate the loaded model
/// (ONNX Runtime today, anything exposing run-a-row semantics tomorrow).
pub trait InferenceEngine: Send + Sync {
    /// Evaluate one standardized feature row and return the model's raw
    /// output values.
    fn infer(&self, features: &[f32]) -> Result<Vec<f32>, DomainError>;
}

/// The orchestrator responsible for validation, standardization, and
/// delegating to the inference engine.
///
/// Owns the normalization parameters and the engine handle exclusively; both
/// are acquired once and never mutated, so every `predict` call depends only
/// on its own input.
pub struct PredictionService {
    params: NormalizationParameters,
    engine: Arc<dyn InferenceEngine>,
    config: ServiceConfig,
}

impl PredictionService {
    pub fn new(
        params: NormalizationParameters,
        engine: Arc<dyn InferenceEngine>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            params,
            engine,
            config,
        }
    }

    /// Predict a price for the raw feature values in `request`.
    pub fn predict(&self, request: PredictRequest) -> Result<PredictResponse, DomainError> {
        let price = self.predict_value(&request.features)?;

        Ok(PredictResponse {
            price,
            display: format!("{}{:.2}", self.config.currency, price),
        })
    }

    /// Core prediction path: validate, standardize, run the model, take the
    /// first output element.
    ///
    /// The length check happens inside `standardize`, before any numeric work
    /// and before the engine is touched. The model may declare more than one
    /// output value; everything past the first is ignored.
    pub fn predict_value(&self, features: &[f32]) -> Result<f32, DomainError> {
        let scaled = self.params.standardize(features)?;
        let output = self.engine.infer(&scaled)?;

        output
            .first()
            .copied()
            .ok_or_else(|| DomainError::inference("model returned no output values"))
    }

    /// Number of features the loaded scaler (and therefore the model) expects.
    pub fn feature_count(&self) -> usize {
        self.params.dims()
    }

    pub fn health(&self) -> Result<HealthStatusResponse, DomainError> {
        Ok(HealthStatusResponse {
            ok: true,
            message: "ready".into(),
            details: Some(format!(
                "features: {}, checked_at: {}",
                self.params.dims(),
                Utc::now()
            )),
        })
    }
}
