use serde::{Deserialize, Serialize};

use crate::constants::{
    FALLBACK_OPTIMAL_KCAL, OTHER_STORES, PRIMARY_STORE_ID, SIGNIFICANT_DEVIATION, UNCATEGORIZED,
};

/// Period statistics view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Relative deviation (0.10 = 10%) treated as off-target.
    pub significant_deviation: f64,
    pub primary_store_id: i64,
    pub other_category_label: String,
    pub uncategorized_label: String,
    pub fallback_optimal_kcal: f64,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            significant_deviation: SIGNIFICANT_DEVIATION,
            primary_store_id: PRIMARY_STORE_ID,
            other_category_label: OTHER_STORES.to_string(),
            uncategorized_label: UNCATEGORIZED.to_string(),
            fallback_optimal_kcal: FALLBACK_OPTIMAL_KCAL,
        }
    }
}
