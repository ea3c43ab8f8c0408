//! `IOptimalTargetStore` trait: per-day frozen targets.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::errors::PortionResult;
use crate::models::{DateRange, OptimalTarget};

pub trait IOptimalTargetStore: Send + Sync {
    fn get_target(&self, date: NaiveDate) -> PortionResult<Option<OptimalTarget>>;

    /// Atomic get-or-insert keyed on the date. When a record exists it is
    /// returned unchanged and `candidate` is dropped.
    fn get_or_create_target(&self, candidate: &OptimalTarget) -> PortionResult<OptimalTarget>;

    /// All stored targets inside `range`, ordered by date.
    fn targets_in(&self, range: DateRange) -> PortionResult<Vec<OptimalTarget>>;
}

impl<T: IOptimalTargetStore + ?Sized> IOptimalTargetStore for Arc<T> {
    fn get_target(&self, date: NaiveDate) -> PortionResult<Option<OptimalTarget>> {
        (**self).get_target(date)
    }
    fn get_or_create_target(&self, candidate: &OptimalTarget) -> PortionResult<OptimalTarget> {
        (**self).get_or_create_target(candidate)
    }
    fn targets_in(&self, range: DateRange) -> PortionResult<Vec<OptimalTarget>> {
        (**self).targets_in(range)
    }
}
