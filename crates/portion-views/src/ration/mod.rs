//! Daily ration view: one calendar day of ration log lines against that
//! day's frozen target.

mod aggregate;
mod view;

pub use aggregate::{
    compute_ration, daily_totals, day_deviation, entries_for_date, group_by_meal, MealBlock,
    RationCache,
};
pub use view::{resolve_daily_target, RationParams, RationSources, RationView};
