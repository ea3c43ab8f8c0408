mod entry;
mod identity;
mod macros;
mod meal;
mod optimal_target;
mod period;

pub use entry::{Deduction, Entry, EntryKind, Serving};
pub use identity::{AccountKind, Identity, UserProfile};
pub use macros::Macros;
pub use meal::Meal;
pub use optimal_target::OptimalTarget;
pub use period::{DateRange, Period};
