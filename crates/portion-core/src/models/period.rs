use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Number of calendar days covered.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Reporting period of the statistics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Week,
    Month,
    Year,
}

impl Period {
    /// Calendar bounds of the period containing `reference`.
    ///
    /// Weeks are ISO weeks (Monday through Sunday).
    pub fn bounds(&self, reference: NaiveDate) -> DateRange {
        match self {
            Period::Week => {
                let offset = u64::from(reference.weekday().num_days_from_monday());
                let start = reference.checked_sub_days(Days::new(offset)).unwrap_or(reference);
                let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
                DateRange::new(start, end)
            }
            Period::Month => {
                let start = reference.with_day(1).unwrap_or(reference);
                let next_month = if reference.month() == 12 {
                    NaiveDate::from_ymd_opt(reference.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(reference.year(), reference.month() + 1, 1)
                };
                let end = next_month.and_then(|d| d.pred_opt()).unwrap_or(reference);
                DateRange::new(start, end)
            }
            Period::Year => {
                let year = reference.year();
                DateRange::new(
                    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(reference),
                    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(reference),
                )
            }
        }
    }
}
