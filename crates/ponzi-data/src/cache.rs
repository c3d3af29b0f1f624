//! On-disk response cache.
//!
//! Bodies live at `<root>/chart/<request key>.json`. Writes go to a
//! temporary sibling first and are renamed into place.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::request::ApiRequest;

#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            dir: root.as_ref().join("chart"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, request: &ApiRequest) -> PathBuf {
        self.dir.join(format!("{}.json", request.key()))
    }

    /// Cached body for `request`, if any. Read failures count as a miss.
    pub async fn read(&self, request: &ApiRequest) -> Option<String> {
        let path = self.path_for(request);
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => {
                log::debug!("cache hit {}", path.display());
                Some(body)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("failed to read cache file {}: {e}", path.display());
                None
            }
        }
    }

    pub async fn write(&self, request: &ApiRequest, body: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(request);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &path).await?;
        log::debug!("cached {}", path.display());
        Ok(())
    }

    /// Forget a cached body, e.g. when it no longer decodes.
    pub async fn remove(&self, request: &ApiRequest) {
        let path = self.path_for(request);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("failed to remove cache file {}: {e}", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ponzi_core::Symbol;

    #[tokio::test]
    async fn test_write_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(tmp.path());
        let req = ApiRequest::time_series_daily(&Symbol::parse("SPY").unwrap());

        assert_eq!(cache.read(&req).await, None);
        cache.write(&req, "{}").await.unwrap();
        assert_eq!(cache.read(&req).await.as_deref(), Some("{}"));
        assert!(cache.path_for(&req).ends_with("chart/TIME_SERIES_DAILY-SPY-compact-json.json"));

        cache.remove(&req).await;
        assert_eq!(cache.read(&req).await, None);
    }
}
