pub mod inventory_config;
pub mod observability_config;
pub mod ration_config;
pub mod remote_config;
pub mod statistics_config;
pub mod storage_config;

use serde::{Deserialize, Serialize};

pub use inventory_config::InventoryConfig;
pub use observability_config::ObservabilityConfig;
pub use ration_config::RationConfig;
pub use remote_config::RemoteConfig;
pub use statistics_config::StatisticsConfig;
pub use storage_config::StorageConfig;

use crate::errors::{PortionError, PortionResult};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PortionConfig {
    pub inventory: InventoryConfig,
    pub ration: RationConfig,
    pub statistics: StatisticsConfig,
    pub remote: RemoteConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl PortionConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> PortionResult<Self> {
        toml::from_str(toml_str).map_err(|e| PortionError::ConfigError(e.to_string()))
    }
}
