//! # portion-storage
//!
//! SQLite persistence layer for the Portion household ledger.
//! Implements `ILocalStore` and `IOptimalTargetStore`.
//! Single connection behind a mutex, WAL mode for file-backed databases.

pub mod engine;
pub mod migrations;
pub mod pragmas;
pub mod queries;

pub use engine::StorageEngine;

/// Helper to convert a string message into a `PortionError::StorageError`.
pub fn to_storage_err(msg: String) -> portion_core::PortionError {
    portion_core::PortionError::StorageError(portion_core::StorageError::SqliteError {
        message: msg,
    })
}
