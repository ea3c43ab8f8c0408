//! Background refresh: generation fencing, single-flight, and the
//! per-view state machine `Idle -> Fetching -> Ready | Degraded`.

mod cell;
mod controller;

pub use cell::{ViewCell, ViewParams, ViewSources, ViewStatus};
pub use controller::{FetchTicket, RefreshController};
