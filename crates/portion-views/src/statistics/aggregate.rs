use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use portion_core::config::StatisticsConfig;
use portion_core::models::{DateRange, Entry, Macros, OptimalTarget};

use crate::recommendation::{Deviation, Recommendation, RecommendationTable};

/// Served macros per calendar day inside `range`. Days without entries are absent.
pub fn daily_sums(entries: &[Entry], range: DateRange) -> BTreeMap<NaiveDate, Macros> {
    let mut sums: BTreeMap<NaiveDate, Macros> = BTreeMap::new();
    for entry in entries.iter().filter(|e| range.contains(e.day())) {
        *sums.entry(entry.day()).or_default() += entry.served();
    }
    sums
}

/// Mean over the days that have at least one entry.
pub fn period_averages(sums: &BTreeMap<NaiveDate, Macros>) -> Macros {
    let total: Macros = sums.values().sum();
    total.divided_by(sums.len() as f64)
}

/// Mean of the stored per-day targets; without any, `profile_targets`;
/// without those, only the fallback energy target.
pub fn target_averages(
    targets: &[OptimalTarget],
    profile_targets: Option<Macros>,
    fallback_kcal: f64,
) -> Macros {
    if !targets.is_empty() {
        let total: Macros = targets.iter().map(|t| t.targets).sum();
        return total.divided_by(targets.len() as f64);
    }
    profile_targets.unwrap_or(Macros {
        kcal: fallback_kcal,
        ..Macros::ZERO
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCost {
    pub category: String,
    pub amount: f64,
}

/// Spend per category. Primary-store purchases keep their own category,
/// everything else is pooled. Largest first; ties by name.
pub fn category_costs(purchases: &[Entry], config: &StatisticsConfig) -> Vec<CategoryCost> {
    let mut buckets: BTreeMap<String, f64> = BTreeMap::new();
    for purchase in purchases {
        let category = if purchase.store_id != config.primary_store_id {
            config.other_category_label.clone()
        } else if purchase.category.is_empty() {
            config.uncategorized_label.clone()
        } else {
            purchase.category.clone()
        };
        *buckets.entry(category).or_default() += purchase.total_cost;
    }

    let mut costs: Vec<CategoryCost> = buckets
        .into_iter()
        .map(|(category, amount)| CategoryCost { category, amount })
        .collect();
    costs.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    costs
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostEfficiency {
    pub total_spend: f64,
    pub total_kcal_purchased: f64,
    pub cost_per_100_kcal: f64,
    /// What one day at the optimal energy target costs at that rate.
    pub optimal_ration_cost: f64,
}

pub fn cost_efficiency(purchases: &[Entry], optimal_kcal: f64) -> CostEfficiency {
    let total_spend: f64 = purchases.iter().map(|p| p.total_cost).sum();
    let total_kcal_purchased: f64 = purchases.iter().map(|p| p.nutrition().kcal).sum();
    let cost_per_100_kcal = if total_kcal_purchased > 0.0 {
        total_spend / (total_kcal_purchased / 100.0)
    } else {
        0.0
    };
    CostEfficiency {
        total_spend,
        total_kcal_purchased,
        cost_per_100_kcal,
        optimal_ration_cost: cost_per_100_kcal * optimal_kcal / 100.0,
    }
}

/// `|actual - target| / target * 100`, 0 for a non-positive target.
pub fn deviation_percentage(actual: f64, target: f64) -> f64 {
    if target > 0.0 {
        (actual - target).abs() / target * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsCache {
    pub range: DateRange,
    pub daily_sums: BTreeMap<NaiveDate, Macros>,
    pub averages: Macros,
    pub target_averages: Macros,
    pub deviation_pct: f64,
    pub deviation: Deviation,
    pub recommendation: Recommendation,
    pub category_costs: Vec<CategoryCost>,
    pub cost: CostEfficiency,
}

/// Everything a statistics recompute reads besides the config.
#[derive(Debug, Clone, Copy)]
pub struct StatisticsInputs<'a> {
    pub rations: &'a [Entry],
    pub purchases: &'a [Entry],
    pub range: DateRange,
    pub day_targets: &'a [OptimalTarget],
    pub profile_targets: Option<Macros>,
}

pub fn compute_statistics(
    inputs: StatisticsInputs<'_>,
    config: &StatisticsConfig,
    table: &RecommendationTable,
) -> StatisticsCache {
    let sums = daily_sums(inputs.rations, inputs.range);
    let averages = period_averages(&sums);
    let targets = target_averages(
        inputs.day_targets,
        inputs.profile_targets,
        config.fallback_optimal_kcal,
    );

    let purchases: Vec<Entry> = inputs
        .purchases
        .iter()
        .filter(|p| inputs.range.contains(p.day()))
        .cloned()
        .collect();
    let optimal_kcal = inputs
        .profile_targets
        .map(|t| t.kcal)
        .filter(|kcal| *kcal > 0.0)
        .unwrap_or(config.fallback_optimal_kcal);

    StatisticsCache {
        range: inputs.range,
        daily_sums: sums,
        deviation_pct: deviation_percentage(averages.kcal, targets.kcal),
        deviation: Deviation::between(averages.kcal, targets.kcal),
        recommendation: table.classify(&averages, &targets),
        averages,
        target_averages: targets,
        category_costs: category_costs(&purchases, config),
        cost: cost_efficiency(&purchases, optimal_kcal),
    }
}
