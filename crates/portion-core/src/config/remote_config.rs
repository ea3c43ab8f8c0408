use serde::{Deserialize, Serialize};

use crate::constants::WIRE_DATE_FORMAT;

/// Remote service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// chrono format string for dates in request bodies and response rows.
    pub date_format: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 10,
            date_format: WIRE_DATE_FORMAT.to_string(),
        }
    }
}
