//! Connection PRAGMAs. Applied once right after opening.

use rusqlite::Connection;

use portion_core::PortionResult;

use crate::to_storage_err;

/// File-backed connection: WAL journal plus a busy timeout.
pub fn configure_file_connection(conn: &Connection) -> PortionResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(|e| to_storage_err(format!("configure connection: {e}")))
}

/// In-memory connection. WAL does not apply.
pub fn configure_memory_connection(conn: &Connection) -> PortionResult<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(|e| to_storage_err(format!("configure connection: {e}")))
}
