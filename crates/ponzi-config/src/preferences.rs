//! User preferences persisted as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use ponzi_core::{PriceStyle, Symbol};
use serde::{Deserialize, Serialize};

use crate::{config_dir, ConfigError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub symbol: Symbol,
}

impl From<Symbol> for StockEntry {
    fn from(symbol: Symbol) -> Self {
        Self { symbol }
    }
}

/// Current symbol, watchlist order and chosen price style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stock: Option<StockEntry>,
    #[serde(default)]
    pub stocks: Vec<StockEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_style: Option<PriceStyle>,
}

impl Preferences {
    pub fn new(current: Option<&Symbol>, stocks: &[Symbol], price_style: Option<PriceStyle>) -> Self {
        Self {
            current_stock: current.cloned().map(StockEntry::from),
            stocks: stocks.iter().cloned().map(StockEntry::from).collect(),
            price_style,
        }
    }

    pub fn current_symbol(&self) -> Option<&Symbol> {
        self.current_stock.as_ref().map(|s| &s.symbol)
    }

    /// Watchlist symbols in saved order, duplicates dropped.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut out: Vec<Symbol> = Vec::with_capacity(self.stocks.len());
        for entry in &self.stocks {
            if !out.contains(&entry.symbol) {
                out.push(entry.symbol.clone());
            }
        }
        out
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Location of the preferences file and the load/save logic around it.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<config-dir>/ponzi2/config.json`.
    pub fn default_location() -> Result<Self, ConfigError> {
        let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::new(dir.join("config.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read preferences. A missing file yields empty preferences; so does a
    /// malformed one, after a warning.
    pub fn load(&self) -> Result<Preferences, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no preferences at {}", self.path.display());
                return Ok(Preferences::default());
            }
            Err(e) => return Err(ConfigError::io(&self.path, e)),
        };
        match serde_json::from_str(&content) {
            Ok(prefs) => Ok(prefs),
            Err(e) => {
                log::warn!("ignoring malformed preferences {}: {e}", self.path.display());
                Ok(Preferences::default())
            }
        }
    }

    /// Write preferences through a sibling temporary file and a rename, so a
    /// crash mid-write leaves the previous file intact.
    pub fn save(&self, prefs: &Preferences) -> Result<(), ConfigError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| ConfigError::io(dir, e))?;
        }
        let json = prefs.to_json()?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| ConfigError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| ConfigError::io(&self.path, e))?;
        log::debug!("saved preferences to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Symbol {
        Symbol::parse(s).unwrap()
    }

    #[test]
    fn test_watchlist_file_format() {
        let prefs = Preferences::new(Some(&sym("QQQ")), &[sym("SPY"), sym("QQQ")], None);
        assert_eq!(
            prefs.to_json().unwrap(),
            r#"{"currentStock":{"symbol":"QQQ"},"stocks":[{"symbol":"SPY"},{"symbol":"QQQ"}]}"#
        );
    }

    #[test]
    fn test_price_style_written_when_set() {
        let prefs = Preferences::new(None, &[], Some(PriceStyle::Bar));
        assert_eq!(prefs.to_json().unwrap(), r#"{"stocks":[],"priceStyle":"Bar"}"#);
    }

    #[test]
    fn test_round_trip_through_store() {
        let tmp = tempfile::tempdir().unwrap();
        let store = PreferencesStore::new(tmp.path().join("ponzi2").join("config.json"));
        assert_eq!(store.load().unwrap(), Preferences::default());

        let prefs = Preferences::new(
            Some(&sym("QQQ")),
            &[sym("SPY"), sym("QQQ")],
            Some(PriceStyle::Candlestick),
        );
        store.save(&prefs).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, prefs);
        assert_eq!(loaded.symbols(), vec![sym("SPY"), sym("QQQ")]);
        assert_eq!(loaded.current_symbol(), Some(&sym("QQQ")));
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        let store = PreferencesStore::new(&path);
        assert_eq!(store.load().unwrap(), Preferences::default());

        fs::write(&path, r#"{"stocks":[{"symbol":"bad symbol!"}]}"#).unwrap();
        assert_eq!(store.load().unwrap(), Preferences::default());
    }

    #[test]
    fn test_duplicate_entries_collapse() {
        let json = r#"{"stocks":[{"symbol":"SPY"},{"symbol":"spy"},{"symbol":"DIA"}]}"#;
        let prefs: Preferences = serde_json::from_str(json).unwrap();
        assert_eq!(prefs.symbols(), vec![sym("SPY"), sym("DIA")]);
    }
}
