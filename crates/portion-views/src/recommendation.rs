//! Rule-based recommendations as ordered decision tables.
//!
//! A table has a calorie tier (first matching rule wins) followed by a
//! per-macro tier that sorts protein, fat and carbs into excess and deficit
//! lists. Thresholds come from config; text rendering lives in `Display`.

use std::fmt;

use serde::Serialize;

use portion_core::config::{RationConfig, StatisticsConfig};
use portion_core::models::Macros;

/// Three-way comparison of an actual value against its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Deviation {
    Below,
    Above,
    Equal,
}

impl Deviation {
    pub fn between(actual: f64, target: f64) -> Self {
        if actual < target {
            Self::Below
        } else if actual > target {
            Self::Above
        } else {
            Self::Equal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Nutrient {
    Protein,
    Fat,
    Carbs,
}

impl Nutrient {
    pub const ALL: [Nutrient; 3] = [Self::Protein, Self::Fat, Self::Carbs];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Protein => "protein",
            Self::Fat => "fat",
            Self::Carbs => "carbs",
        }
    }

    fn of(&self, m: &Macros) -> f64 {
        match self {
            Self::Protein => m.protein,
            Self::Fat => m.fat,
            Self::Carbs => m.carbs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    IncreaseCalories,
    ReduceCalories,
    Balanced,
    Adjust {
        excess: Vec<Nutrient>,
        deficit: Vec<Nutrient>,
    },
    /// Period view with no usable energy target.
    NoTarget,
}

fn join(nutrients: &[Nutrient]) -> String {
    let names: Vec<&str> = nutrients.iter().map(Nutrient::name).collect();
    match names.as_slice() {
        [] => String::new(),
        [one] => (*one).to_string(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncreaseCalories => f.write_str("Needs more calories: increase energy intake"),
            Self::ReduceCalories => {
                f.write_str("Calorie target exceeded: decrease energy intake")
            }
            Self::Balanced => f.write_str("Balanced: keep it up"),
            Self::NoTarget => f.write_str("No energy target set"),
            Self::Adjust { excess, deficit } => match (excess.is_empty(), deficit.is_empty()) {
                (false, false) => write!(
                    f,
                    "Adjust balance: reduce {} and increase {}",
                    join(excess),
                    join(deficit)
                ),
                (false, true) => write!(f, "Reduce {}", join(excess)),
                (true, false) => write!(f, "Increase {}", join(deficit)),
                (true, true) => f.write_str("Balanced: keep it up"),
            },
        }
    }
}

/// Condition on the energy completion percentage (actual / target * 100).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalorieCondition {
    Below(f64),
    AtLeast(f64),
    Above(f64),
}

impl CalorieCondition {
    fn matches(&self, completion_pct: f64) -> bool {
        match *self {
            Self::Below(limit) => completion_pct < limit,
            Self::AtLeast(limit) => completion_pct >= limit,
            Self::Above(limit) => completion_pct > limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalorieRule {
    pub condition: CalorieCondition,
    pub outcome: Recommendation,
}

/// When a macro difference counts as off-target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MacroTolerance {
    /// Any non-zero difference.
    Exact,
    /// `|actual - target| / target` above the fraction.
    Relative(f64),
}

impl MacroTolerance {
    fn is_significant(&self, actual: f64, target: f64) -> bool {
        let diff = actual - target;
        match *self {
            Self::Exact => diff != 0.0,
            Self::Relative(fraction) if target != 0.0 => (diff / target).abs() > fraction,
            Self::Relative(_) => diff != 0.0,
        }
    }
}

/// Completion percentage, 0 when the target is not positive.
pub fn completion_percentage(actual: f64, target: f64) -> f64 {
    if target > 0.0 {
        actual / target * 100.0
    } else {
        0.0
    }
}

/// Sort the macros into (excess, deficit) lists in protein, fat, carbs order.
pub fn classify_macros(
    actual: &Macros,
    target: &Macros,
    tolerance: MacroTolerance,
) -> (Vec<Nutrient>, Vec<Nutrient>) {
    let mut excess = Vec::new();
    let mut deficit = Vec::new();
    for nutrient in Nutrient::ALL {
        let (a, t) = (nutrient.of(actual), nutrient.of(target));
        if !tolerance.is_significant(a, t) {
            continue;
        }
        if a > t {
            excess.push(nutrient);
        } else {
            deficit.push(nutrient);
        }
    }
    (excess, deficit)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationTable {
    pub calorie_rules: Vec<CalorieRule>,
    pub macro_tolerance: MacroTolerance,
    /// Report `NoTarget` instead of classifying against a non-positive target.
    pub requires_target: bool,
}

impl RecommendationTable {
    /// Day view: below 95% asks for more, at or above 105% is exceeded,
    /// otherwise any macro difference counts.
    pub fn daily(config: &RationConfig) -> Self {
        Self {
            calorie_rules: vec![
                CalorieRule {
                    condition: CalorieCondition::Below(config.lower_completion_pct),
                    outcome: Recommendation::IncreaseCalories,
                },
                CalorieRule {
                    condition: CalorieCondition::AtLeast(config.upper_completion_pct),
                    outcome: Recommendation::ReduceCalories,
                },
            ],
            macro_tolerance: MacroTolerance::Exact,
            requires_target: false,
        }
    }

    /// Period view: energy off by more than the significant deviation in
    /// either direction, then macros off by more than the same fraction.
    pub fn period(config: &StatisticsConfig) -> Self {
        let band = config.significant_deviation * 100.0;
        Self {
            calorie_rules: vec![
                CalorieRule {
                    condition: CalorieCondition::Below(100.0 - band),
                    outcome: Recommendation::IncreaseCalories,
                },
                CalorieRule {
                    condition: CalorieCondition::Above(100.0 + band),
                    outcome: Recommendation::ReduceCalories,
                },
            ],
            macro_tolerance: MacroTolerance::Relative(config.significant_deviation),
            requires_target: true,
        }
    }

    pub fn classify(&self, actual: &Macros, target: &Macros) -> Recommendation {
        if self.requires_target && target.kcal <= 0.0 {
            return Recommendation::NoTarget;
        }

        let completion = completion_percentage(actual.kcal, target.kcal);
        if let Some(rule) = self
            .calorie_rules
            .iter()
            .find(|rule| rule.condition.matches(completion))
        {
            return rule.outcome.clone();
        }

        let (excess, deficit) = classify_macros(actual, target, self.macro_tolerance);
        if excess.is_empty() && deficit.is_empty() {
            Recommendation::Balanced
        } else {
            Recommendation::Adjust { excess, deficit }
        }
    }
}
