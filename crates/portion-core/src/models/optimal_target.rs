use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Macros, UserProfile};

/// Frozen daily targets for one calendar date.
///
/// Created once from the profile the first time the date is viewed and
/// never updated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimalTarget {
    pub date: NaiveDate,
    pub targets: Macros,
}

impl OptimalTarget {
    pub fn new(date: NaiveDate, targets: Macros) -> Self {
        Self { date, targets }
    }

    pub fn from_profile(date: NaiveDate, profile: &UserProfile) -> Self {
        Self::new(date, profile.targets)
    }
}
