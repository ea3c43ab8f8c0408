use serde::{Deserialize, Serialize};

use crate::constants::{COMPLETION_LOWER_PCT, COMPLETION_UPPER_PCT};

/// Daily ration view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RationConfig {
    /// Completion below this asks for more calories.
    pub lower_completion_pct: f64,
    /// Completion at or above this flags the target as exceeded.
    pub upper_completion_pct: f64,
}

impl Default for RationConfig {
    fn default() -> Self {
        Self {
            lower_completion_pct: COMPLETION_LOWER_PCT,
            upper_completion_pct: COMPLETION_UPPER_PCT,
        }
    }
}
