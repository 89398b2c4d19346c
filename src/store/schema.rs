use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Last good copy of a remote dataset, kept for offline starts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CachedDataset {
    pub schema_version: u32,
    pub key: String,
    pub fetched_at: DateTime<Utc>,
    pub csv: String,
}

impl CachedDataset {
    pub fn new(key: &str, csv: String) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            key: key.to_string(),
            fetched_at: Utc::now(),
            csv,
        }
    }

    /// Check if loaded data has a stale schema version and should be ignored.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn is_fresh(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at) <= max_age
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness() {
        let mut cached = CachedDataset::new("k", String::new());
        let now = Utc::now();
        assert!(cached.is_fresh(Duration::hours(1), now));
        cached.fetched_at = now - Duration::hours(3);
        assert!(!cached.is_fresh(Duration::hours(2), now));
    }

    #[test]
    fn test_needs_reset_on_version_mismatch() {
        let mut cached = CachedDataset::new("k", String::new());
        assert!(!cached.needs_reset());
        cached.schema_version = SCHEMA_VERSION + 1;
        assert!(cached.needs_reset());
    }
}
