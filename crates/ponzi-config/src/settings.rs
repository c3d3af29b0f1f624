//! TOML settings file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{config_dir, ConfigError, APP_DIR};

/// File name looked up in the working directory.
const LOCAL_FILE: &str = "ponzi2.toml";

/// Root settings structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub api: ApiConfig,
    pub cache: CacheConfig,
}

impl Config {
    /// Load settings from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config: Config = toml::from_str(&content)?;
        log::info!("loaded settings from {}", path.display());
        Ok(config)
    }

    /// Load settings from default locations.
    ///
    /// Searches in order:
    /// 1. `./ponzi2.toml`
    /// 2. `<config-dir>/ponzi2/config.toml`
    ///
    /// Returns defaults if no file is found. A file that exists but does
    /// not parse is an error.
    pub fn load_default() -> Result<Self, ConfigError> {
        let candidates = std::iter::once(PathBuf::from(LOCAL_FILE))
            .chain(config_dir().map(|d| d.join("config.toml")));
        for path in candidates {
            if path.is_file() {
                return Self::load(&path);
            }
        }
        log::debug!("no settings file found, using defaults");
        Ok(Self::default())
    }

    /// Save settings to a file path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::io(path, e))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Serve embedded sample data instead of calling the provider.
    pub demo: bool,
}

/// Market data provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub api_token: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub min_request_interval_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: "https://www.alphavantage.co/query".to_string(),
            timeout_secs: 30,
            min_request_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enable_chart_cache: bool,
    /// Defaults to `<cache-dir>/ponzi2`.
    pub cache_dir: Option<PathBuf>,
    pub dump_api_responses: bool,
}

impl CacheConfig {
    /// Get the cache root, using the platform default if not specified.
    pub fn resolved_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            api_token = "ABC"

            [cache]
            enable_chart_cache = true
            "#,
        )
        .unwrap();
        assert_eq!(config.api.api_token, "ABC");
        assert_eq!(config.api.min_request_interval_ms, 1000);
        assert!(config.cache.enable_chart_cache);
        assert!(!config.cache.dump_api_responses);
        assert!(!config.general.demo);
    }

    #[test]
    fn test_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ponzi2.toml");
        let mut config = Config::default();
        config.general.demo = true;
        config.cache.cache_dir = Some(tmp.path().join("cache"));
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_file_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ponzi2.toml");
        fs::write(&path, "[api\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Toml(_))));
        assert!(matches!(
            Config::load(tmp.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_explicit_cache_dir_wins() {
        let cache = CacheConfig {
            cache_dir: Some(PathBuf::from("/tmp/x")),
            ..Default::default()
        };
        assert_eq!(cache.resolved_cache_dir(), PathBuf::from("/tmp/x"));
    }
}
