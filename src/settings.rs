use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Default filename used to persist configuration within the data directory.
const CONFIG_FILENAME: &str = "config.json";

/// Filesystem locations of the two artifacts the service is built from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactPaths {
    #[serde(default = "default_model_path")]
    pub model: PathBuf,
    #[serde(default = "default_scaler_path")]
    pub scaler: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: default_model_path(),
            scaler: default_scaler_path(),
        }
    }
}

/// Complete persisted configuration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub artifacts: ArtifactPaths,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactPaths::default(),
            currency: default_currency(),
        }
    }
}

/// Thread-safe manager responsible for loading and persisting `AppConfig`.
pub struct ConfigManager {
    path: PathBuf,
    state: RwLock<AppConfig>,
}

impl ConfigManager {
    /// Create a manager rooted at `data_dir`. The JSON file will be located at
    /// `<data_dir>/config.json`.
    pub fn load(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = data_dir.as_ref().join(CONFIG_FILENAME);
        let config = if path.exists() {
            fs::read(&path)
                .ok()
                .and_then(|bytes| serde_json::from_slice::<AppConfig>(&bytes).ok())
                .unwrap_or_default()
        } else {
            AppConfig::default()
        };

        Ok(Self {
            path,
            state: RwLock::new(config),
        })
    }

    /// Snapshot of the current configuration.
    pub fn current(&self) -> AppConfig {
        self.state.read().expect("config poisoned").clone()
    }

    /// Update the artifact locations and persist to disk.
    pub fn set_artifacts(&self, artifacts: ArtifactPaths) -> std::io::Result<AppConfig> {
        {
            let mut guard = self.state.write().expect("config poisoned");
            guard.artifacts = artifacts;
            self.persist_locked(&guard)?;
        }
        Ok(self.current())
    }

    /// Ensure the backing directory exists and write the JSON payload.
    fn persist_locked(&self, config: &AppConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_vec_pretty(config)?;
        fs::write(&self.path, payload)
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("mlp_model.onnx")
}

fn default_scaler_path() -> PathBuf {
    PathBuf::from("scaler_params.json")
}

fn default_currency() -> String {
    "₱".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_exported_artifact_names() {
        let config = AppConfig::default();
        assert_eq!(config.artifacts.model, PathBuf::from("mlp_model.onnx"));
        assert_eq!(config.artifacts.scaler, PathBuf::from("scaler_params.json"));
        assert_eq!(config.currency, "₱");
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!("presyo-{}-nocfg", std::process::id()));
        let manager = ConfigManager::load(&dir).unwrap();
        assert_eq!(manager.current().artifacts, ArtifactPaths::default());
    }

    #[test]
    fn set_artifacts_persists_and_reloads() {
        let dir = std::env::temp_dir().join(format!("presyo-{}-cfg", std::process::id()));
        let manager = ConfigManager::load(&dir).unwrap();

        let updated = manager
            .set_artifacts(ArtifactPaths {
                model: PathBuf::from("/models/house.onnx"),
                scaler: PathBuf::from("/models/house_scaler.json"),
            })
            .unwrap();
        assert_eq!(updated.artifacts.model, PathBuf::from("/models/house.onnx"));

        let reloaded = ConfigManager::load(&dir).unwrap();
        assert_eq!(reloaded.current().artifacts, updated.artifacts);
        let _ = fs::remove_dir_all(dir);
    }
}
