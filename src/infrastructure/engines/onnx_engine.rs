use std::path::{Path, PathBuf};

use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use parking_lot::Mutex;
use tracing::info;

use crate::{application::services::InferenceEngine, domain::DomainError};

/// Inference engine backed by an ONNX Runtime session.
///
/// The engine keeps a single `Session` behind a `Mutex`, which allows the
/// loaded graph to be reused for every request while serializing access: the
/// runtime session is not documented as safe for concurrent invocation.
pub struct OnnxEngine {
    model_path: PathBuf,
    input_name: String,
    output_name: String,
    session: Mutex<Session>,
}

impl OnnxEngine {
    /// Open the ONNX artifact at `path` and resolve its input/output slots.
    ///
    /// Execution is pinned to a single intra-op thread and basic graph
    /// optimizations so that numeric output stays aligned with the exported
    /// reference model.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();

        ort::init().commit().map_err(|err| {
            DomainError::model_load(format!("failed to initialise ONNX Runtime: {err}"))
        })?;

        let session = Session::builder()
            .and_then(|builder| builder.with_optimization_level(GraphOptimizationLevel::Level1))
            .and_then(|builder| builder.with_intra_threads(1))
            .and_then(|builder| builder.commit_from_file(path))
            .map_err(|err| {
                DomainError::model_load(format!(
                    "failed to load model from {}: {err}",
                    path.display()
                ))
            })?;

        // Slot names come from the graph metadata, never from hardcoded
        // strings; the exported model declares exactly one input.
        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| {
                DomainError::model_load(format!(
                    "model {} declares no input slot",
                    path.display()
                ))
            })?;

        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| {
                DomainError::model_load(format!(
                    "model {} declares no output slot",
                    path.display()
                ))
            })?;

        info!(
            model = %path.display(),
            input = %input_name,
            output = %output_name,
            "ONNX model loaded"
        );

        Ok(Self {
            model_path: path.to_path_buf(),
            input_name,
            output_name,
            session: Mutex::new(session),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl InferenceEngine for OnnxEngine {
    fn infer(&self, features: &[f32]) -> Result<Vec<f32>, DomainError> {
        // The graph was exported with a [1, N] input: one row, N features.
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .map_err(|err| DomainError::inference(format!("failed to create input tensor: {err}")))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(|err| DomainError::inference(format!("model evaluation failed: {err}")))?;

        let value = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            DomainError::inference(format!(
                "model produced no output named `{}`",
                self.output_name
            ))
        })?;

        let (_, data) = value.try_extract_tensor::<f32>().map_err(|err| {
            DomainError::inference(format!("failed to read output tensor: {err}"))
        })?;

        if data.is_empty() {
            return Err(DomainError::inference("model returned an empty output tensor"));
        }

        Ok(data.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artifact_is_a_model_load_error() {
        let err = OnnxEngine::load("/definitely/not/here.onnx").unwrap_err();
        assert!(matches!(err, DomainError::ModelLoad(_)));
    }

    #[test]
    fn corrupt_artifact_is_a_model_load_error() {
        let path = std::env::temp_dir().join(format!("presyo-{}-bad.onnx", std::process::id()));
        std::fs::write(&path, b"this is not a protobuf").unwrap();
        let err = OnnxEngine::load(&path).unwrap_err();
        assert!(matches!(err, DomainError::ModelLoad(_)));
        let _ = std::fs::remove_file(path);
    }
}
