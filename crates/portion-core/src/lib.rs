//! # portion-core
//!
//! Foundation crate for the Portion household ledger.
//! Defines the entry model, identities, per-day targets, errors, config,
//! constants and the storage/fetcher traits. Every other crate in the
//! workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod telemetry;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::PortionConfig;
pub use errors::{FetchError, PortionError, PortionResult, StorageError};
pub use models::{
    AccountKind, DateRange, Deduction, Entry, EntryKind, Identity, Macros, Meal, OptimalTarget,
    Period, Serving, UserProfile,
};
pub use traits::{ILocalStore, IOptimalTargetStore, IRemoteFetcher, OrderReceipt};
