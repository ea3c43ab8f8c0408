//! `ILocalStore` trait: the durable keyed record store.
//!
//! Single-record operations are transactional. The two composite write
//! paths (`log_serving`, `record_order`) run as one transaction each.

use std::sync::Arc;

use crate::errors::PortionResult;
use crate::models::{Deduction, Entry, EntryKind};

/// Outcome of recording a placed order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OrderReceipt {
    /// Rows appended to the purchase history.
    pub purchases_recorded: usize,
    /// New inventory rows created.
    pub inventory_inserted: usize,
    /// Existing inventory rows topped up.
    pub inventory_merged: usize,
}

/// Durable local store for all entry kinds.
pub trait ILocalStore: Send + Sync {
    fn list(&self, kind: EntryKind) -> PortionResult<Vec<Entry>>;

    fn get(&self, kind: EntryKind, id: i64) -> PortionResult<Option<Entry>>;

    /// Insert a new row and return its id. `entry.id` is ignored.
    fn insert(&self, kind: EntryKind, entry: &Entry) -> PortionResult<i64>;

    /// Overwrite an existing row. Fails with `NotFound` when `entry.id` is unknown.
    fn save(&self, kind: EntryKind, entry: &Entry) -> PortionResult<()>;

    fn delete(&self, kind: EntryKind, id: i64) -> PortionResult<()>;

    /// Deduct `line.serving` from inventory row `inventory_id` and append
    /// `line` to the ration log. Re-validates against the stored row and
    /// aborts without changes on `InsufficientQuantity`. The inventory row
    /// is deleted when nothing is left.
    fn log_serving(&self, inventory_id: i64, line: &Entry) -> PortionResult<Deduction>;

    /// Append every item to the purchase history and merge the items from
    /// `primary_store_id` into inventory.
    fn record_order(&self, items: &[Entry], primary_store_id: i64) -> PortionResult<OrderReceipt>;
}

impl<T: ILocalStore + ?Sized> ILocalStore for Arc<T> {
    fn list(&self, kind: EntryKind) -> PortionResult<Vec<Entry>> {
        (**self).list(kind)
    }
    fn get(&self, kind: EntryKind, id: i64) -> PortionResult<Option<Entry>> {
        (**self).get(kind, id)
    }
    fn insert(&self, kind: EntryKind, entry: &Entry) -> PortionResult<i64> {
        (**self).insert(kind, entry)
    }
    fn save(&self, kind: EntryKind, entry: &Entry) -> PortionResult<()> {
        (**self).save(kind, entry)
    }
    fn delete(&self, kind: EntryKind, id: i64) -> PortionResult<()> {
        (**self).delete(kind, id)
    }
    fn log_serving(&self, inventory_id: i64, line: &Entry) -> PortionResult<Deduction> {
        (**self).log_serving(inventory_id, line)
    }
    fn record_order(&self, items: &[Entry], primary_store_id: i64) -> PortionResult<OrderReceipt> {
        (**self).record_order(items, primary_store_id)
    }
}
