pub mod json;

use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "safesip.json";
pub const CONFIG_ENV: &str = "SAFESIP_CONFIG";

const DEFAULT_MODEL_PATH: &str = "random_forest_model.json";
const DEFAULT_SCALER_PATH: &str = "random_forest_scaler.json";
const DEFAULT_LOG_PATH: &str = "safesip.log";

/// Where the app finds its artifacts and writes its log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.into(),
            scaler_path: DEFAULT_SCALER_PATH.into(),
            log_path: DEFAULT_LOG_PATH.into(),
        }
    }
}

/// The config file to read: `$SAFESIP_CONFIG`, or `./safesip.json`.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
