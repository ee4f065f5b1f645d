use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Payload accepted from the UI when requesting a prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub features: Vec<f32>,
}

/// Result of a prediction, carrying both the raw scalar and a display string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub price: f32,
    pub display: String,
}

/// Snapshot of the artifacts the active service was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactInfoResponse {
    pub feature_count: usize,
    pub model_path: String,
    pub scaler_path: String,
}

/// Health/readiness report for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatusResponse {
    pub ok: bool,
    pub message: String,
    pub details: Option<String>,
}

/// Request to rebuild the service against a different model/scaler pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateArtifactsRequest {
    pub model_path: Option<String>,
    pub scaler_path: Option<String>,
}

/// Parse one comma-separated line from the input form into feature values.
///
/// Empty segments (trailing commas, doubled commas) are skipped, matching the
/// form's tolerant behaviour. Any non-numeric segment rejects the whole line.
pub fn parse_feature_line(line: &str) -> Result<Vec<f32>, DomainError> {
    let mut values = Vec::new();
    for part in line.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value: f32 = trimmed
            .parse()
            .map_err(|_| DomainError::validation(format!("`{trimmed}` is not a number")))?;
        values.push(value);
    }

    if values.is_empty() {
        return Err(DomainError::validation("no feature values supplied"));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_line() {
        let values = parse_feature_line("3,2,85,60,14.5995,120.98").unwrap();
        assert_eq!(values, vec![3.0, 2.0, 85.0, 60.0, 14.5995, 120.98]);
    }

    #[test]
    fn skips_empty_segments_and_whitespace() {
        let values = parse_feature_line(" 1.5, , 2.5,,3 ,").unwrap();
        assert_eq!(values, vec![1.5, 2.5, 3.0]);
    }

    #[test]
    fn rejects_non_numeric_segments() {
        let err = parse_feature_line("1,two,3").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(err.to_string().contains("two"));
    }

    #[test]
    fn rejects_blank_lines() {
        assert!(matches!(
            parse_feature_line("  ,, "),
            Err(DomainError::Validation(_))
        ));
    }
}
