use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{DomainError, NormalizationParameters};

/// On-disk layout of the scaler export. Only `mean` and `scale` are
/// interpreted; any other keys in the file are ignored.
#[derive(Debug, Deserialize)]
struct ScalerFile {
    mean: Vec<f32>,
    scale: Vec<f32>,
}

/// Load the per-feature normalization statistics from a JSON scaler export.
///
/// Pure function of the file contents. Any failure (unreadable file, invalid
/// JSON, missing keys, invalid values) surfaces as a `Config` error and
/// leaves no partially constructed parameters behind.
pub fn load_scaler(path: impl AsRef<Path>) -> Result<NormalizationParameters, DomainError> {
    let path = path.as_ref();

    let bytes = fs::read(path).map_err(|err| {
        DomainError::config(format!(
            "failed to read scaler file {}: {err}",
            path.display()
        ))
    })?;

    let file: ScalerFile = serde_json::from_slice(&bytes).map_err(|err| {
        DomainError::config(format!(
            "malformed scaler file {}: {err}",
            path.display()
        ))
    })?;

    NormalizationParameters::try_new(file.mean, file.scale)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("presyo-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_well_formed_scaler_file() {
        let path = write_fixture(
            "ok.json",
            r#"{"mean": [1.0, 2.0, 3.0], "scale": [2.0, 4.0, 5.0]}"#,
        );
        let params = load_scaler(&path).unwrap();
        assert_eq!(params.dims(), 3);
        assert_eq!(params.mean(), &[1.0, 2.0, 3.0]);
        assert_eq!(params.scale(), &[2.0, 4.0, 5.0]);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn ignores_unrelated_keys() {
        let path = write_fixture(
            "extra.json",
            r#"{"mean": [0.0], "scale": [1.0], "n_samples": 920}"#,
        );
        assert_eq!(load_scaler(&path).unwrap().dims(), 1);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_scale_key_is_a_config_error() {
        let path = write_fixture("noscale.json", r#"{"mean": [1.0, 2.0]}"#);
        let err = load_scaler(&path).unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let path = write_fixture("garbage.json", "not json at all");
        assert!(matches!(
            load_scaler(&path),
            Err(DomainError::Config(_))
        ));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = load_scaler("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }
}
