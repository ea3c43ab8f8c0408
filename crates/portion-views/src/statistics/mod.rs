//! Period statistics view: week/month/year averages of the ration log,
//! spending by category and cost efficiency of purchases.

mod aggregate;
mod view;

pub use aggregate::{
    category_costs, compute_statistics, cost_efficiency, daily_sums, deviation_percentage,
    period_averages, target_averages, CategoryCost, CostEfficiency, StatisticsCache,
    StatisticsInputs,
};
pub use view::{StatisticsParams, StatisticsSources, StatisticsView};
