//! `StorageEngine`: owns the SQLite connection and implements the
//! `portion-core` storage traits.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use moka::sync::Cache;
use rusqlite::Connection;
use tracing::{debug, info};

use portion_core::config::StorageConfig;
use portion_core::models::{DateRange, Deduction, Entry, EntryKind, OptimalTarget};
use portion_core::traits::{ILocalStore, IOptimalTargetStore, OrderReceipt};
use portion_core::{PortionResult, StorageError};

use crate::queries::{entry_ops, ledger_ops, target_ops, with_immediate_transaction};
use crate::{migrations, pragmas, to_storage_err};

const DEFAULT_TARGET_CACHE_CAPACITY: u64 = 400;

/// The local store.
///
/// One connection behind a mutex; every trait call takes the lock for its
/// whole duration, so composite writes never interleave. Per-day targets are
/// frozen once written and are served from a read-through cache.
pub struct StorageEngine {
    conn: Mutex<Connection>,
    targets: Cache<NaiveDate, OptimalTarget>,
}

impl StorageEngine {
    /// Open a file-backed store, creating it if needed, and run migrations.
    pub fn open(path: &Path) -> PortionResult<Self> {
        Self::init(connect_file(path)?, DEFAULT_TARGET_CACHE_CAPACITY)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> PortionResult<Self> {
        Self::init(connect_memory()?, DEFAULT_TARGET_CACHE_CAPACITY)
    }

    /// Open according to config: file-backed when `db_path` is set.
    pub fn from_config(config: &StorageConfig) -> PortionResult<Self> {
        let conn = match &config.db_path {
            Some(path) => connect_file(path)?,
            None => connect_memory()?,
        };
        Self::init(conn, config.target_cache_capacity)
    }

    fn init(conn: Connection, cache_capacity: u64) -> PortionResult<Self> {
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            targets: Cache::new(cache_capacity),
        })
    }

    /// Current schema version.
    pub fn schema_version(&self) -> PortionResult<u32> {
        self.with_conn(migrations::current_version)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> PortionResult<T>) -> PortionResult<T> {
        let conn = self.lock();
        f(&conn)
    }
}

fn connect_file(path: &Path) -> PortionResult<Connection> {
    let conn = Connection::open(path)
        .map_err(|e| to_storage_err(format!("open {}: {e}", path.display())))?;
    pragmas::configure_file_connection(&conn)?;
    info!(path = %path.display(), "opened local store");
    Ok(conn)
}

fn connect_memory() -> PortionResult<Connection> {
    let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
    pragmas::configure_memory_connection(&conn)?;
    Ok(conn)
}

impl ILocalStore for StorageEngine {
    fn list(&self, kind: EntryKind) -> PortionResult<Vec<Entry>> {
        self.with_conn(|conn| entry_ops::list_entries(conn, kind))
    }

    fn get(&self, kind: EntryKind, id: i64) -> PortionResult<Option<Entry>> {
        self.with_conn(|conn| entry_ops::get_entry(conn, kind, id))
    }

    fn insert(&self, kind: EntryKind, entry: &Entry) -> PortionResult<i64> {
        let id = self.with_conn(|conn| entry_ops::insert_entry(conn, kind, entry))?;
        debug!(%kind, id, product_id = entry.product_id, "inserted entry");
        Ok(id)
    }

    fn save(&self, kind: EntryKind, entry: &Entry) -> PortionResult<()> {
        let id = entry.id.ok_or_else(|| StorageError::NotFound {
            kind: kind.to_string(),
            id: 0,
        })?;
        let changed = self.with_conn(|conn| entry_ops::update_entry(conn, kind, id, entry))?;
        if changed == 0 {
            return Err(StorageError::NotFound {
                kind: kind.to_string(),
                id,
            }
            .into());
        }
        Ok(())
    }

    fn delete(&self, kind: EntryKind, id: i64) -> PortionResult<()> {
        let removed = self.with_conn(|conn| entry_ops::delete_entry(conn, kind, id))?;
        if removed == 0 {
            return Err(StorageError::NotFound {
                kind: kind.to_string(),
                id,
            }
            .into());
        }
        Ok(())
    }

    fn log_serving(&self, inventory_id: i64, line: &Entry) -> PortionResult<Deduction> {
        self.with_conn(|conn| {
            with_immediate_transaction(conn, |conn| {
                ledger_ops::log_serving(conn, inventory_id, line)
            })
        })
    }

    fn record_order(&self, items: &[Entry], primary_store_id: i64) -> PortionResult<OrderReceipt> {
        let receipt = self.with_conn(|conn| {
            with_immediate_transaction(conn, |conn| {
                ledger_ops::record_order(conn, items, primary_store_id)
            })
        })?;
        info!(
            purchases = receipt.purchases_recorded,
            inserted = receipt.inventory_inserted,
            merged = receipt.inventory_merged,
            "recorded order"
        );
        Ok(receipt)
    }
}

impl IOptimalTargetStore for StorageEngine {
    fn get_target(&self, date: NaiveDate) -> PortionResult<Option<OptimalTarget>> {
        if let Some(hit) = self.targets.get(&date) {
            return Ok(Some(hit));
        }
        let found = self.with_conn(|conn| target_ops::get_target(conn, date))?;
        if let Some(target) = found {
            self.targets.insert(date, target);
        }
        Ok(found)
    }

    fn get_or_create_target(&self, candidate: &OptimalTarget) -> PortionResult<OptimalTarget> {
        if let Some(hit) = self.targets.get(&candidate.date) {
            return Ok(hit);
        }
        let stored = self.with_conn(|conn| {
            if target_ops::insert_target_if_absent(conn, candidate)? {
                debug!(date = %candidate.date, "materialized daily target");
            }
            target_ops::get_target(conn, candidate.date)?.ok_or_else(|| {
                to_storage_err(format!("target for {} vanished after insert", candidate.date))
            })
        })?;
        self.targets.insert(stored.date, stored);
        Ok(stored)
    }

    fn targets_in(&self, range: DateRange) -> PortionResult<Vec<OptimalTarget>> {
        self.with_conn(|conn| target_ops::targets_between(conn, range))
    }
}
