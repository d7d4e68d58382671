//! Application configuration loaded from the platform config directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub chat: ChatParams,
    pub auth: AuthParams,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatParams {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            base_url: "https://brainman.is-a-cool.dev".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthParams {
    pub base_url: String,
}

impl Default for AuthParams {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8090".to_string(),
        }
    }
}

pub fn get_app_config_path() -> PathBuf {
    let config_dir = dirs_next::config_dir().expect("Failed to find config directory");
    let app_config_dir = config_dir.join("brainchat").join("configuration");
    if !app_config_dir.exists() {
        fs::create_dir_all(&app_config_dir).expect("Failed to create app config directory");
    }
    app_config_dir.join("settings.json")
}

pub fn load_or_initialize() -> AppConfig {
    load_or_initialize_at(&get_app_config_path())
}

/// Reads the settings file, writing defaults when it is absent or malformed.
fn load_or_initialize_at(config_path: &Path) -> AppConfig {
    if config_path.exists() {
        let content = fs::read_to_string(config_path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(error = %e, "Malformed settings file, rewriting defaults");
            let default_config = AppConfig::default();
            fs::write(
                config_path,
                serde_json::to_string_pretty(&default_config).unwrap(),
            )
            .ok();
            default_config
        })
    } else {
        let default_config = AppConfig::default();
        fs::write(
            config_path,
            serde_json::to_string_pretty(&default_config).unwrap(),
        )
        .expect("Failed to write default config file");
        default_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_run_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let config = load_or_initialize_at(&path);
        assert_eq!(config.chat.base_url, "https://brainman.is-a-cool.dev");
        assert_eq!(config.chat.timeout_secs, 30);
        assert!(path.exists());
    }

    #[test]
    fn existing_settings_are_honored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"chat":{"base_url":"http://localhost:9000","timeout_secs":5},"auth":{"base_url":"http://localhost:8090"}}"#,
        )
        .unwrap();

        let config = load_or_initialize_at(&path);
        assert_eq!(config.chat.base_url, "http://localhost:9000");
        assert_eq!(config.chat.timeout_secs, 5);
    }

    #[test]
    fn malformed_settings_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json at all").unwrap();

        let config = load_or_initialize_at(&path);
        assert_eq!(config.chat.timeout_secs, 30);

        // The file was rewritten with defaults, so a second load parses clean.
        let reloaded = load_or_initialize_at(&path);
        assert_eq!(reloaded.chat.base_url, config.chat.base_url);
    }
}
