use crate::domain::errors::DomainError;

/// Per-feature standardization statistics exported from the training pipeline.
///
/// Holds two equal-length vectors: the training-set mean and scale of every
/// feature. Loaded once at startup and immutable afterwards; every prediction
/// request is standardized against the same statistics the model was trained
/// with.
#[derive(Debug, Clone)]
pub struct NormalizationParameters {
    mean: Vec<f32>,
    scale: Vec<f32>,
}

impl NormalizationParameters {
    /// Validate and construct the parameter set.
    ///
    /// Rejects mismatched or empty vectors, non-finite entries, and zero
    /// scale entries (which would divide by zero during standardization).
    pub fn try_new(mean: Vec<f32>, scale: Vec<f32>) -> Result<Self, DomainError> {
        if mean.len() != scale.len() {
            return Err(DomainError::config(format!(
                "mean has {} entries but scale has {}",
                mean.len(),
                scale.len()
            )));
        }
        if mean.is_empty() {
            return Err(DomainError::config("mean and scale cannot be empty"));
        }
        if let Some(idx) = mean.iter().position(|v| !v.is_finite()) {
            return Err(DomainError::config(format!(
                "mean[{idx}] is not a finite number"
            )));
        }
        if let Some(idx) = scale.iter().position(|v| !v.is_finite() || *v == 0.0) {
            return Err(DomainError::config(format!(
                "scale[{idx}] must be finite and nonzero"
            )));
        }

        Ok(Self { mean, scale })
    }

    /// Number of features the loaded model expects.
    pub fn dims(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f32] {
        &self.mean
    }

    pub fn scale(&self) -> &[f32] {
        &self.scale
    }

    /// Z-score a raw feature vector against the training statistics.
    ///
    /// Each index is transformed independently: `(x[i] - mean[i]) / scale[i]`.
    /// Fails with `DimensionMismatch` before touching any value when the
    /// input length differs from the parameter length.
    pub fn standardize(&self, features: &[f32]) -> Result<Vec<f32>, DomainError> {
        if features.len() != self.dims() {
            return Err(DomainError::dimension_mismatch(self.dims(), features.len()));
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_lengths() {
        let err = NormalizationParameters::try_new(vec![1.0, 2.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }

    #[test]
    fn rejects_zero_scale() {
        let err = NormalizationParameters::try_new(vec![1.0, 2.0], vec![1.0, 0.0]).unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }

    #[test]
    fn rejects_non_finite_mean() {
        let err =
            NormalizationParameters::try_new(vec![f32::NAN, 2.0], vec![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }

    #[test]
    fn identity_parameters_leave_input_unchanged() {
        let params =
            NormalizationParameters::try_new(vec![0.0, 0.0, 0.0], vec![1.0, 1.0, 1.0]).unwrap();
        let raw = vec![3.5, -2.25, 0.0];
        assert_eq!(params.standardize(&raw).unwrap(), raw);
    }

    #[test]
    fn standardize_is_per_index_and_deterministic() {
        let params =
            NormalizationParameters::try_new(vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 5.0]).unwrap();
        let raw = vec![3.0, 2.0, 8.0];
        let first = params.standardize(&raw).unwrap();
        assert_eq!(first, vec![1.0, 0.0, 1.0]);
        // Identical input must yield an identical result.
        assert_eq!(params.standardize(&raw).unwrap(), first);
    }

    #[test]
    fn standardize_checks_length_first() {
        let params = NormalizationParameters::try_new(vec![1.0, 2.0], vec![1.0, 1.0]).unwrap();
        let err = params.standardize(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            DomainError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }
}
