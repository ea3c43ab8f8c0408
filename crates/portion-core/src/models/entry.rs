use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{Macros, Meal};
use crate::constants::QUANTITY_EPSILON;
use crate::errors::{PortionError, PortionResult};

/// Which collection an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Inventory,
    RationLog,
    Purchase,
}

impl EntryKind {
    pub const ALL: [EntryKind; 3] = [Self::Inventory, Self::RationLog, Self::Purchase];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::RationLog => "ration_log",
            Self::Purchase => "purchase",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The consumed portion of a ration log line. Values are frozen at log time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Serving {
    pub meal: Meal,
    pub served_volume: f64,
    pub served_volume_grams: f64,
    pub served: Macros,
}

impl Serving {
    /// Portion `served_volume` display units out of `source`.
    ///
    /// Mass is derived through the source's density, and the served macros
    /// are the per-100g values scaled to that mass. Rejects portions larger
    /// than what the source holds.
    pub fn portion(source: &Entry, served_volume: f64, meal: Meal) -> PortionResult<Serving> {
        if !served_volume.is_finite() || served_volume <= 0.0 {
            return Err(PortionError::InvalidInput(format!(
                "served volume must be positive, got {served_volume}"
            )));
        }
        let mut grams = served_volume * source.density();
        if grams > source.volume_grams + QUANTITY_EPSILON
            || served_volume > source.volume + QUANTITY_EPSILON
        {
            return Err(PortionError::InsufficientQuantity {
                product_id: source.product_id,
                available_grams: source.volume_grams,
                requested_grams: grams,
            });
        }
        grams = grams.min(source.volume_grams);
        Ok(Serving {
            meal,
            served_volume,
            served_volume_grams: grams,
            served: source.per_100g.for_grams(grams),
        })
    }
}

/// A nutrition-bearing record: inventory item, ration log line or purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Local row id. `None` for entries that only exist in a remote snapshot.
    pub id: Option<i64>,
    pub product_id: i64,
    pub name: String,
    pub volume: f64,
    pub unit: String,
    pub volume_grams: f64,
    pub per_100g: Macros,
    pub tag: String,
    pub category: String,
    pub preference: String,
    pub expire_date: NaiveDate,
    /// Order date for inventory and purchases, consumption time for ration lines.
    pub recorded_at: NaiveDateTime,
    pub owner_user_id: String,
    pub owner_family_id: String,
    pub store_id: i64,
    pub store_name: String,
    pub total_cost: f64,
    pub serving: Option<Serving>,
}

impl Entry {
    /// A bare entry with no quantity or nutrition, expiring on the day it was recorded.
    pub fn new(product_id: i64, name: impl Into<String>, recorded_at: NaiveDateTime) -> Self {
        Self {
            id: None,
            product_id,
            name: name.into(),
            volume: 0.0,
            unit: String::new(),
            volume_grams: 0.0,
            per_100g: Macros::ZERO,
            tag: String::new(),
            category: String::new(),
            preference: String::new(),
            expire_date: recorded_at.date(),
            recorded_at,
            owner_user_id: String::new(),
            owner_family_id: String::new(),
            store_id: 0,
            store_name: String::new(),
            total_cost: 0.0,
            serving: None,
        }
    }

    pub fn with_quantity(mut self, volume: f64, unit: impl Into<String>, volume_grams: f64) -> Self {
        self.volume = volume;
        self.unit = unit.into();
        self.volume_grams = volume_grams;
        self
    }

    pub fn with_nutrition(mut self, per_100g: Macros) -> Self {
        self.per_100g = per_100g;
        self
    }

    pub fn expiring(mut self, date: NaiveDate) -> Self {
        self.expire_date = date;
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_preference(mut self, preference: impl Into<String>) -> Self {
        self.preference = preference.into();
        self
    }

    pub fn owned_by(mut self, user_id: impl Into<String>, family_id: impl Into<String>) -> Self {
        self.owner_user_id = user_id.into();
        self.owner_family_id = family_id.into();
        self
    }

    pub fn from_store(mut self, store_id: i64, store_name: impl Into<String>, total_cost: f64) -> Self {
        self.store_id = store_id;
        self.store_name = store_name.into();
        self.total_cost = total_cost;
        self
    }

    pub fn with_serving(mut self, serving: Serving) -> Self {
        self.serving = Some(serving);
        self
    }

    /// Build the ration log line for `serving` taken out of `source`.
    pub fn ration_line(
        source: &Entry,
        serving: Serving,
        consumed_at: NaiveDateTime,
        user_id: impl Into<String>,
    ) -> Entry {
        Entry {
            id: None,
            recorded_at: consumed_at,
            owner_user_id: user_id.into(),
            serving: Some(serving),
            ..source.clone()
        }
    }

    /// Grams per display unit. Entries without a display volume count 1:1.
    pub fn density(&self) -> f64 {
        if self.volume > 0.0 {
            self.volume_grams / self.volume
        } else {
            1.0
        }
    }

    /// Nutrition of the whole held quantity.
    pub fn nutrition(&self) -> Macros {
        self.per_100g.for_grams(self.volume_grams)
    }

    /// Pre-computed served macros, zero for entries without a serving.
    pub fn served(&self) -> Macros {
        self.serving.map(|s| s.served).unwrap_or_default()
    }

    pub fn day(&self) -> NaiveDate {
        self.recorded_at.date()
    }
}

/// Result of deducting a serving from an inventory entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deduction {
    pub remaining_volume: f64,
    pub remaining_grams: f64,
}

impl Deduction {
    /// Validate and compute the deduction of `serving` from `inventory`.
    pub fn plan(inventory: &Entry, serving: &Serving) -> PortionResult<Deduction> {
        if serving.served_volume_grams > inventory.volume_grams + QUANTITY_EPSILON
            || serving.served_volume > inventory.volume + QUANTITY_EPSILON
        {
            return Err(PortionError::InsufficientQuantity {
                product_id: inventory.product_id,
                available_grams: inventory.volume_grams,
                requested_grams: serving.served_volume_grams,
            });
        }
        Ok(Deduction {
            remaining_volume: (inventory.volume - serving.served_volume).max(0.0),
            remaining_grams: (inventory.volume_grams - serving.served_volume_grams).max(0.0),
        })
    }

    /// Nothing left; the inventory entry is removed.
    pub fn exhausts(&self) -> bool {
        self.remaining_grams <= QUANTITY_EPSILON
    }
}
