use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{
    domain::ReturnsScenario,
    errors::{PropFlowError, Result},
    utils::paths::{ensure_dir, write_atomic, PathResolver},
};

pub const API_BASE_URL_ENV: &str = "PROPFLOW_API_BASE_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    pub api_base_url: String,
    #[serde(default)]
    pub default_scenario: ReturnsScenario,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            default_scenario: ReturnsScenario::Positive,
            reports_dir: None,
        }
    }
}

impl Config {
    /// Upstream base URL with the environment override applied and no trailing slash.
    pub fn effective_api_base_url(&self) -> String {
        let raw = env::var(API_BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.api_base_url.clone());
        raw.trim().trim_end_matches('/').to_string()
    }

    /// Updates one field from its string form, as entered in the shell.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "locale" => self.locale = value.to_string(),
            "currency" => self.currency = value.to_ascii_uppercase(),
            "api_base_url" => {
                if value.is_empty() {
                    return Err(PropFlowError::Config("api_base_url cannot be empty".into()));
                }
                self.api_base_url = value.to_string();
            }
            "default_scenario" => {
                self.default_scenario = value.parse().map_err(PropFlowError::Config)?;
            }
            "reports_dir" => {
                self.reports_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            other => {
                return Err(PropFlowError::Config(format!(
                    "unknown configuration key `{other}`"
                )))
            }
        }
        Ok(())
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| PropFlowError::Config(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Directory report exports are written to.
    pub fn reports_dir(&self, config: &Config) -> PathBuf {
        config
            .reports_dir
            .clone()
            .unwrap_or_else(|| PathResolver::reports_dir_in(&self.base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.set_value("default_scenario", "negative").unwrap();
        config.set_value("currency", "eur").unwrap();
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.default_scenario, ReturnsScenario::Negative);
        assert_eq!(loaded.currency, "EUR");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut config = Config::default();
        let err = config.set_value("theme", "dark").unwrap_err();
        assert!(err.to_string().contains("theme"));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "[]").unwrap();
        assert!(matches!(manager.load(), Err(PropFlowError::Config(_))));
    }

    #[test]
    fn reports_dir_defaults_under_base() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let dir = manager.reports_dir(&Config::default());
        assert_eq!(dir, temp.path().join("reports"));
    }
}
