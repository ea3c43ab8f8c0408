use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Local store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file. `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
    /// Max per-day targets held in the read-through cache.
    pub target_cache_capacity: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            target_cache_capacity: 400,
        }
    }
}
