use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};

use crate::store::schema::CachedDataset;

/// JSON files under the data directory, one per dataset source key.
pub struct DatasetCache {
    base_dir: PathBuf,
}

impl DatasetCache {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ordtrener")
            .join("cache");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating cache dir {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", sanitize_key(key)))
    }

    /// Atomic write: serialize to a temp file, sync, then rename over the target.
    pub fn save(&self, key: &str, csv: &str) -> Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("tmp");

        let data = CachedDataset::new(key, csv.to_string());
        let json = serde_json::to_string_pretty(&data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        log::debug!("cached dataset {key:?} at {}", path.display());
        Ok(())
    }

    /// Cached copy for `key` regardless of age. `None` if missing, corrupt,
    /// from another schema version, or written for a different key.
    pub fn load_any(&self, key: &str) -> Option<CachedDataset> {
        let path = self.file_path(key);
        let content = fs::read_to_string(&path).ok()?;
        let cached: CachedDataset = match serde_json::from_str(&content) {
            Ok(cached) => cached,
            Err(e) => {
                log::warn!("ignoring unreadable cache {}: {e}", path.display());
                return None;
            }
        };
        if cached.needs_reset() || cached.key != key {
            log::info!("ignoring stale cache {}", path.display());
            return None;
        }
        Some(cached)
    }

    pub fn load_fresh(&self, key: &str, max_age: Duration) -> Option<CachedDataset> {
        self.load_any(key)
            .filter(|cached| cached.is_fresh(max_age, Utc::now()))
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.file_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
