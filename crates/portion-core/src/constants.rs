/// Entries expiring within this many days are listed as soon-expiring.
pub const SOON_EXPIRING_DAYS: i64 = 20;

/// Expiry sentinel offset. An entry dated `today + 100 years` never expires.
pub const NO_EXPIRY_YEARS: u32 = 100;

/// Daily energy target used for inventory ration counts when the profile has none.
pub const FALLBACK_DAILY_KCAL: f64 = 2100.0;

/// Daily energy target used for period statistics when neither stored
/// targets nor the profile provide one.
pub const FALLBACK_OPTIMAL_KCAL: f64 = 2500.0;

/// Daily completion below this percentage asks for more calories.
pub const COMPLETION_LOWER_PCT: f64 = 95.0;

/// Daily completion at or above this percentage flags the target as exceeded.
pub const COMPLETION_UPPER_PCT: f64 = 105.0;

/// Relative deviation above which a period value counts as off-target.
pub const SIGNIFICANT_DEVIATION: f64 = 0.10;

/// Store ID of the household's own primary store.
pub const PRIMARY_STORE_ID: i64 = 1;

/// Tolerance for quantity comparisons, in grams or volume units.
pub const QUANTITY_EPSILON: f64 = 1e-6;

/// Date format used by the remote wire rows.
pub const WIRE_DATE_FORMAT: &str = "%d.%m.%Y";

/// Family ID sent for personal accounts.
pub const PERSONAL_FAMILY_ID: &str = "0";

/// Category label for primary-store purchases with no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Category label for purchases from any other store.
pub const OTHER_STORES: &str = "Other";

/// Owner bucket for entries with no owner user ID.
pub const UNKNOWN_OWNER: &str = "unknown";
