use std::{io, path::Path};

use super::AppConfig;

/// Loads an [`AppConfig`] from a JSON file.
///
/// A missing file yields the defaults; any key left out keeps its default.
///
/// # Errors
/// Returns a human-readable string if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<AppConfig, String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => return Err(format!("cannot read '{}': {e}", path.display())),
    };

    parse_config(&content)
}

/// Parses the contents of a config file.
///
/// # Errors
/// Returns a human-readable string on invalid JSON or mistyped keys.
pub fn parse_config(content: &str) -> Result<AppConfig, String> {
    let val: serde_json::Value =
        serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))?;

    if !val.is_object() {
        return Err("config must be a JSON object".into());
    }

    let mut config = AppConfig::default();

    let path_field = |key: &str| -> Result<Option<&str>, String> {
        match &val[key] {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(s) if !s.trim().is_empty() => Ok(Some(s.trim())),
            _ => Err(format!("{key} must be a non-empty string")),
        }
    };

    if let Some(p) = path_field("model_path")? {
        config.model_path = p.into();
    }
    if let Some(p) = path_field("scaler_path")? {
        config.scaler_path = p.into();
    }
    if let Some(p) = path_field("log_path")? {
        config.log_path = p.into();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_keeps_defaults() {
        assert_eq!(parse_config("{}"), Ok(AppConfig::default()));
    }

    #[test]
    fn overrides_only_given_keys() {
        let config = parse_config(r#"{ "model_path": "models/mlp.json" }"#).unwrap();

        assert_eq!(config.model_path, Path::new("models/mlp.json"));
        assert_eq!(config.scaler_path, AppConfig::default().scaler_path);
    }

    #[test]
    fn rejects_non_string_paths() {
        let err = parse_config(r#"{ "scaler_path": 3 }"#).unwrap_err();
        assert!(err.contains("scaler_path"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_config("{ model_path").is_err());
        assert!(parse_config("[]").is_err());
    }

    #[test]
    fn missing_file_means_defaults() {
        let path = std::env::temp_dir().join("safesip-no-such-config.json");
        assert_eq!(load_config(&path), Ok(AppConfig::default()));
    }
}
