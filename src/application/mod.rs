//! Application layer wiring DTOs and services for Presyo.

pub mod dtos;
pub mod services;

pub use dtos::{
    parse_feature_line, ArtifactInfoResponse, HealthStatusResponse, PredictRequest,
    PredictResponse, UpdateArtifactsRequest,
};
pub use services::PredictionService;
