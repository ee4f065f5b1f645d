use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use parking_lot::RwLock;
use tauri::State;
use tracing::info;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod settings;

use application::services::ServiceConfig;
use application::{
    parse_feature_line, ArtifactInfoResponse, HealthStatusResponse, PredictRequest,
    PredictResponse, PredictionService, UpdateArtifactsRequest,
};
use domain::DomainError;
use infrastructure::{load_scaler, OnnxEngine};
use settings::{ArtifactPaths, ConfigManager};

/// Global state shared with Tauri commands.
struct AppState {
    service: Arc<RwLock<Arc<PredictionService>>>,
    config: Arc<ConfigManager>,
}

impl AppState {
    fn new(handles: AppHandles) -> Self {
        Self {
            service: Arc::new(RwLock::new(handles.service)),
            config: handles.config,
        }
    }

    fn service(&self) -> Arc<PredictionService> {
        Arc::clone(&self.service.read())
    }

    fn service_cell(&self) -> Arc<RwLock<Arc<PredictionService>>> {
        Arc::clone(&self.service)
    }

    fn config(&self) -> Arc<ConfigManager> {
        Arc::clone(&self.config)
    }
}

pub struct AppHandles {
    pub service: Arc<PredictionService>,
    pub config: Arc<ConfigManager>,
    pub data_dir: std::path::PathBuf,
}

#[tauri::command]
async fn predict(
    state: State<'_, AppState>,
    payload: PredictRequest,
) -> Result<PredictResponse, String> {
    let service = state.service();
    tauri::async_runtime::spawn_blocking(move || service.predict(payload))
        .await
        .map_err(|err| err.to_string())?
        .map_err(map_domain_error)
}

#[tauri::command]
async fn predict_text(state: State<'_, AppState>, line: String) -> Result<PredictResponse, String> {
    let service = state.service();
    tauri::async_runtime::spawn_blocking(move || {
        let features = parse_feature_line(&line)?;
        service.predict(PredictRequest { features })
    })
    .await
    .map_err(|err| err.to_string())?
    .map_err(map_domain_error)
}

#[tauri::command]
async fn artifact_info(state: State<'_, AppState>) -> Result<ArtifactInfoResponse, String> {
    let config = state.config().current();
    let service = state.service();

    Ok(ArtifactInfoResponse {
        feature_count: service.feature_count(),
        model_path: config.artifacts.model.display().to_string(),
        scaler_path: config.artifacts.scaler.display().to_string(),
    })
}

#[tauri::command]
async fn health(state: State<'_, AppState>) -> Result<HealthStatusResponse, String> {
    let service = state.service();
    tauri::async_runtime::spawn_blocking(move || service.health())
        .await
        .map_err(|err| err.to_string())?
        .map_err(map_domain_error)
}

#[tauri::command]
async fn set_artifacts(
    state: State<'_, AppState>,
    payload: UpdateArtifactsRequest,
) -> Result<ArtifactInfoResponse, String> {
    let service_cell = state.service_cell();
    let config = state.config();

    tauri::async_runtime::spawn_blocking(move || -> Result<ArtifactInfoResponse> {
        let current = config.current();
        let artifacts = ArtifactPaths {
            model: payload
                .model_path
                .map(Into::into)
                .unwrap_or(current.artifacts.model),
            scaler: payload
                .scaler_path
                .map(Into::into)
                .unwrap_or(current.artifacts.scaler),
        };

        // Build the replacement service first; a failed load leaves the
        // previous service and the persisted config untouched.
        let new_service =
            build_service(&artifacts, &current.currency).map_err(|err| anyhow!(err.to_string()))?;

        let updated = config.set_artifacts(artifacts).map_err(|err| anyhow!(err))?;

        {
            let mut guard = service_cell.write();
            *guard = Arc::clone(&new_service);
        }

        info!(
            model = %updated.artifacts.model.display(),
            scaler = %updated.artifacts.scaler.display(),
            "artifacts switched"
        );

        Ok(ArtifactInfoResponse {
            feature_count: new_service.feature_count(),
            model_path: updated.artifacts.model.display().to_string(),
            scaler_path: updated.artifacts.scaler.display().to_string(),
        })
    })
    .await
    .map_err(|err| err.to_string())?
    .map_err(|err| err.to_string())
}

/// Entry point invoked from `main.rs`.
pub fn run() {
    init_tracing();

    if let Err(err) = try_run() {
        eprintln!("[presyo] startup failed: {err:?}");
    }
}

fn try_run() -> Result<()> {
    let handles = build_environment().context("failed to bootstrap Presyo environment")?;
    let app_state = AppState::new(handles);

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            predict,
            predict_text,
            artifact_info,
            health,
            set_artifacts
        ])
        .run(tauri::generate_context!())
        .map_err(|err| anyhow!(err))?;

    Ok(())
}

/// Acquire the two immutable resources and wire the service around them.
///
/// Both loads happen exactly once, before the UI starts; either failure
/// aborts initialization rather than leaving a half-initialized service.
pub fn build_environment() -> Result<AppHandles> {
    let data_dir = resolve_data_dir()?;

    let config = Arc::new(ConfigManager::load(&data_dir).context("failed to load config file")?);
    let active = config.current();

    let artifacts = apply_env_overrides(active.artifacts);

    let service = build_service(&artifacts, &active.currency)
        .map_err(|err| anyhow!(err.to_string()))
        .context("failed to initialise prediction service")?;

    if artifacts != config.current().artifacts {
        // Environment overrides are session-only and never persisted.
        info!(
            model = %artifacts.model.display(),
            scaler = %artifacts.scaler.display(),
            "artifact paths overridden from environment"
        );
    }

    Ok(AppHandles {
        service,
        config,
        data_dir,
    })
}

fn build_service(
    artifacts: &ArtifactPaths,
    currency: &str,
) -> Result<Arc<PredictionService>, DomainError> {
    let params = load_scaler(&artifacts.scaler)?;
    let engine = OnnxEngine::load(&artifacts.model)?;

    info!(
        model = %artifacts.model.display(),
        scaler = %artifacts.scaler.display(),
        features = params.dims(),
        "prediction service ready"
    );

    Ok(Arc::new(PredictionService::new(
        params,
        Arc::new(engine),
        ServiceConfig::new(currency),
    )))
}

fn apply_env_overrides(mut artifacts: ArtifactPaths) -> ArtifactPaths {
    if let Ok(path) = std::env::var("PRESYO_MODEL_PATH") {
        if !path.trim().is_empty() {
            artifacts.model = path.into();
        }
    }
    if let Ok(path) = std::env::var("PRESYO_SCALER_PATH") {
        if !path.trim().is_empty() {
            artifacts.scaler = path.into();
        }
    }
    artifacts
}

fn resolve_data_dir() -> Result<std::path::PathBuf> {
    let dirs = directories::ProjectDirs::from("dev", "presyo", "Presyo")
        .ok_or_else(|| anyhow!("unable to determine OS data dir"))?;
    let dir = dirs.data_dir().to_path_buf();
    std::fs::create_dir_all(&dir).context("failed to create data directory")?;
    Ok(dir)
}

fn init_tracing() {
    static INIT: std::sync::OnceLock<()> = std::sync::OnceLock::new();

    let _ = INIT.get_or_init(|| {
        let filter = std::env::var("PRESYO_LOG").unwrap_or_else(|_| "info".into());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact()
            .try_init();
    });
}

fn map_domain_error(err: DomainError) -> String {
    err.to_string()
}
