use serde::{Deserialize, Serialize};

use crate::constants::{FALLBACK_DAILY_KCAL, NO_EXPIRY_YEARS, SOON_EXPIRING_DAYS, UNKNOWN_OWNER};

/// Inventory (fridge) view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub soon_expiring_days: i64,
    pub no_expiry_years: u32,
    pub fallback_daily_kcal: f64,
    /// Group label for entries without a preferred meal.
    pub default_preference_label: String,
    pub unknown_owner_label: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            soon_expiring_days: SOON_EXPIRING_DAYS,
            no_expiry_years: NO_EXPIRY_YEARS,
            fallback_daily_kcal: FALLBACK_DAILY_KCAL,
            default_preference_label: "No preference".to_string(),
            unknown_owner_label: UNKNOWN_OWNER.to_string(),
        }
    }
}
