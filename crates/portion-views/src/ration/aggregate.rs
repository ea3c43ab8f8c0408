use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use portion_core::models::{Entry, Macros, Meal, OptimalTarget};

use crate::recommendation::{
    completion_percentage, Deviation, Recommendation, RecommendationTable,
};

/// Lines consumed on `date`, compared by calendar day.
pub fn entries_for_date(entries: &[Entry], date: NaiveDate) -> Vec<Entry> {
    entries.iter().filter(|e| e.day() == date).cloned().collect()
}

/// Sum of the frozen served macros. Per-100g values are not consulted.
pub fn daily_totals(entries: &[Entry]) -> Macros {
    entries.iter().map(Entry::served).sum()
}

/// Lines logged under one meal slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealBlock {
    pub meal: Meal,
    pub name: &'static str,
    pub entries: Vec<Entry>,
    pub totals: Macros,
}

/// One block per meal present, breakfast first, custom meals last.
pub fn group_by_meal(entries: &[Entry]) -> Vec<MealBlock> {
    let mut by_meal: BTreeMap<Meal, Vec<Entry>> = BTreeMap::new();
    for entry in entries {
        let meal = entry.serving.map_or(Meal::Other(-1), |s| s.meal);
        by_meal.entry(meal).or_default().push(entry.clone());
    }
    by_meal
        .into_iter()
        .map(|(meal, entries)| MealBlock {
            meal,
            name: meal.name(),
            totals: daily_totals(&entries),
            entries,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RationCache {
    pub date: NaiveDate,
    pub entries: Vec<Entry>,
    pub totals: Macros,
    pub target: OptimalTarget,
    pub completion_pct: f64,
    pub deviation: Deviation,
    pub recommendation: Recommendation,
    pub meals: Vec<MealBlock>,
}

/// Direction of the day's energy against its target. A day without a
/// positive target reads as below it, the same way the calorie tier asks
/// for more.
pub fn day_deviation(actual_kcal: f64, target_kcal: f64) -> Deviation {
    if target_kcal > 0.0 {
        Deviation::between(actual_kcal, target_kcal)
    } else {
        Deviation::Below
    }
}

pub fn compute_ration(
    entries: &[Entry],
    date: NaiveDate,
    target: &OptimalTarget,
    table: &RecommendationTable,
) -> RationCache {
    let day = entries_for_date(entries, date);
    let totals = daily_totals(&day);
    RationCache {
        date,
        completion_pct: completion_percentage(totals.kcal, target.targets.kcal),
        deviation: day_deviation(totals.kcal, target.targets.kcal),
        recommendation: table.classify(&totals, &target.targets),
        meals: group_by_meal(&day),
        target: *target,
        totals,
        entries: day,
    }
}
