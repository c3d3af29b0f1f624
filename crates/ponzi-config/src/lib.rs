//! Configuration management for ponzi2.
//!
//! Two stores live here: the TOML settings file read at startup, and the
//! JSON preferences file rewritten whenever the watchlist or price style
//! changes.

mod preferences;
mod settings;

use std::path::PathBuf;

use thiserror::Error;

pub use preferences::{Preferences, PreferencesStore, StockEntry};
pub use settings::{ApiConfig, CacheConfig, Config, GeneralConfig};

/// Application directory name under the platform config and cache dirs.
pub const APP_DIR: &str = "ponzi2";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[error("failed to encode preferences: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no user configuration directory on this platform")]
    NoConfigDir,
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}

/// `<config-dir>/ponzi2`, if the platform has a config directory.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR))
}
