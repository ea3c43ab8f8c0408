//! v002: per-day frozen targets, one row per calendar date.

use rusqlite::Connection;

use portion_core::errors::PortionResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PortionResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS optimal_targets (
            date        TEXT PRIMARY KEY,
            kcal        REAL NOT NULL,
            protein     REAL NOT NULL,
            fat         REAL NOT NULL,
            carbs       REAL NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
