use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::hiscores::DEFAULT_BASE_URL;

const CONFIG_DIR_ENV: &str = "MAXVIEW_CONFIG_DIR";
const CONFIG_DIR_NAME: &str = "maxview";
const CONFIG_FILE_NAME: &str = "maxview.config";
const API_URL_ENV: &str = "MAXVIEW_API_URL";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Last username submitted; restored on the next launch so a lookup
    /// can be reproduced without retyping it.
    #[serde(default)]
    pub last_user: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            last_user: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Effective stats endpoint: the environment override wins over the
/// config file.
pub fn resolve_api_url(cfg: &AppConfig) -> String {
    match env::var(API_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => url,
        _ => cfg.api_url.clone(),
    }
}

pub fn load() -> Result<AppConfig> {
    let path = config_path();
    match fs::read(&path) {
        Ok(bytes) => {
            let cfg: AppConfig = serde_json::from_slice(&bytes)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?;
            Ok(cfg)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to read config at {}", path.display()))
        }
    }
}

pub fn save(cfg: &AppConfig) -> Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Unable to create config directory {}", parent.display()))?;
    }
    let data = serde_json::to_vec_pretty(cfg)?;
    fs::write(&path, data)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}

pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

pub fn config_dir() -> PathBuf {
    if let Some(path) = env::var_os(CONFIG_DIR_ENV) {
        PathBuf::from(path)
    } else if let Some(path) = env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(path).join(CONFIG_DIR_NAME)
    } else if let Some(home) = env::var_os("HOME") {
        Path::new(&home).join(".config").join(CONFIG_DIR_NAME)
    } else if let Some(appdata) = env::var_os("APPDATA") {
        PathBuf::from(appdata).join(CONFIG_DIR_NAME)
    } else {
        PathBuf::from(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_json() {
        let cfg = AppConfig {
            api_url: "http://localhost:8787".to_string(),
            last_user: Some("zezima".to_string()),
        };
        let data = serde_json::to_vec(&cfg).unwrap();
        let back: AppConfig = serde_json::from_slice(&data).unwrap();
        assert_eq!(back.api_url, cfg.api_url);
        assert_eq!(back.last_user, cfg.last_user);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.api_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.last_user, None);
    }
}
