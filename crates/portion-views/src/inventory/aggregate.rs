use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, Months, NaiveDate};
use serde::Serialize;

use portion_core::config::InventoryConfig;
use portion_core::models::{Entry, Macros, UserProfile};

/// Dates that decide whether an entry is soon-expiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryWindow {
    /// Entries expiring strictly before this date are soon-expiring.
    pub threshold: NaiveDate,
    /// Expiry date that means "does not expire".
    pub no_expiry: NaiveDate,
}

impl ExpiryWindow {
    pub fn new(today: NaiveDate, config: &InventoryConfig) -> Self {
        let days = u64::try_from(config.soon_expiring_days).unwrap_or_default();
        Self {
            threshold: today.checked_add_days(Days::new(days)).unwrap_or(today),
            no_expiry: today
                .checked_add_months(Months::new(config.no_expiry_years.saturating_mul(12)))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn is_soon_expiring(&self, entry: &Entry) -> bool {
        entry.expire_date < self.threshold && entry.expire_date != self.no_expiry
    }
}

/// Split into (soon-expiring, rest).
pub fn partition(entries: &[Entry], window: &ExpiryWindow) -> (Vec<Entry>, Vec<Entry>) {
    entries
        .iter()
        .cloned()
        .partition(|entry| window.is_soon_expiring(entry))
}

pub fn group_by_category(entries: &[Entry]) -> BTreeMap<String, Vec<Entry>> {
    let mut groups: BTreeMap<String, Vec<Entry>> = BTreeMap::new();
    for entry in entries {
        groups
            .entry(entry.category.clone())
            .or_default()
            .push(entry.clone());
    }
    groups
}

/// Group on the preferred meal; entries without one go under `default_label`.
pub fn group_by_preference(entries: &[Entry], default_label: &str) -> BTreeMap<String, Vec<Entry>> {
    let mut groups: BTreeMap<String, Vec<Entry>> = BTreeMap::new();
    for entry in entries {
        let key = if entry.preference.is_empty() {
            default_label.to_string()
        } else {
            entry.preference.clone()
        };
        groups.entry(key).or_default().push(entry.clone());
    }
    groups
}

/// Nutrition of the held quantities.
pub fn totals(entries: &[Entry]) -> Macros {
    entries.iter().map(Entry::nutrition).sum()
}

/// Whole days of food at `daily_kcal`. Non-positive targets use `fallback_kcal`.
pub fn full_rations_remaining(entries: &[Entry], daily_kcal: f64, fallback_kcal: f64) -> u64 {
    let divisor = if daily_kcal > 0.0 {
        daily_kcal
    } else {
        fallback_kcal
    };
    if divisor <= 0.0 {
        return 0;
    }
    let rations = (totals(entries).kcal / divisor).floor();
    if rations.is_finite() && rations > 0.0 {
        rations as u64
    } else {
        0
    }
}

fn owner_key<'a>(entry: &'a Entry, unknown_label: &'a str) -> &'a str {
    if entry.owner_user_id.is_empty() {
        unknown_label
    } else {
        &entry.owner_user_id
    }
}

/// Distinct owners; ownerless entries share one `unknown_label` bucket.
pub fn unique_owner_count(entries: &[Entry], unknown_label: &str) -> usize {
    entries
        .iter()
        .map(|e| owner_key(e, unknown_label))
        .collect::<BTreeSet<_>>()
        .len()
}

pub fn group_by_owner(entries: &[Entry], unknown_label: &str) -> BTreeMap<String, Vec<Entry>> {
    let mut groups: BTreeMap<String, Vec<Entry>> = BTreeMap::new();
    for entry in entries {
        groups
            .entry(owner_key(entry, unknown_label).to_string())
            .or_default()
            .push(entry.clone());
    }
    groups
}

/// Per-member split, family accounts only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerBreakdown {
    pub unique_owners: usize,
    pub by_owner: BTreeMap<String, Vec<Entry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryCache {
    pub soon_expiring: Vec<Entry>,
    pub by_category: BTreeMap<String, Vec<Entry>>,
    pub by_preference: BTreeMap<String, Vec<Entry>>,
    /// Totals over every current entry.
    pub totals: Macros,
    pub full_rations_remaining: u64,
    pub owners: Option<OwnerBreakdown>,
}

pub fn compute_inventory(
    entries: &[Entry],
    profile: Option<&UserProfile>,
    config: &InventoryConfig,
    today: NaiveDate,
) -> InventoryCache {
    let window = ExpiryWindow::new(today, config);
    let (soon_expiring, rest) = partition(entries, &window);
    let daily_kcal = profile.map(|p| p.targets.kcal).unwrap_or_default();

    let owners = profile
        .filter(|p| p.identity.is_family())
        .map(|_| OwnerBreakdown {
            unique_owners: unique_owner_count(entries, &config.unknown_owner_label),
            by_owner: group_by_owner(entries, &config.unknown_owner_label),
        });

    InventoryCache {
        by_category: group_by_category(&rest),
        by_preference: group_by_preference(&rest, &config.default_preference_label),
        soon_expiring,
        totals: totals(entries),
        full_rations_remaining: full_rations_remaining(
            entries,
            daily_kcal,
            config.fallback_daily_kcal,
        ),
        owners,
    }
}
