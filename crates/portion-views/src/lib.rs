//! # portion-views
//!
//! The reconciliation-and-aggregation core of the Portion household ledger.
//!
//! Each view (inventory, daily ration, period statistics) owns a
//! [`ReconciledStore`](reconcile::ReconciledStore) per entity kind, a
//! parameter set, and an aggregate cache that is recomputed as a whole
//! whenever either changes. Remote fetches run in the background under a
//! [`RefreshController`](refresh::RefreshController) that coalesces
//! duplicate requests and discards results of superseded parameters.
//! [`Household`](household::Household) wires the views to the local store,
//! the remote fetcher and the single-writer write path.

pub mod clock;
pub mod household;
pub mod inventory;
pub mod ration;
pub mod recommendation;
pub mod reconcile;
pub mod refresh;
pub mod statistics;
pub mod writer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use household::{Household, WriteOutcome};
pub use inventory::{InventoryCache, InventoryView};
pub use ration::{RationCache, RationView};
pub use recommendation::{Deviation, Nutrient, Recommendation, RecommendationTable};
pub use reconcile::{ReconciledStore, RemoteState};
pub use refresh::{RefreshController, ViewStatus};
pub use statistics::{StatisticsCache, StatisticsView};
pub use writer::ConsumptionWriter;
