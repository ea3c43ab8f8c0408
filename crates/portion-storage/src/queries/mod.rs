pub mod entry_ops;
pub mod ledger_ops;
pub mod target_ops;

use rusqlite::Connection;

use portion_core::PortionResult;

use crate::to_storage_err;

/// Run `f` inside `BEGIN IMMEDIATE` / `COMMIT`, rolling back on any error.
pub fn with_immediate_transaction<T>(
    conn: &Connection,
    f: impl FnOnce(&Connection) -> PortionResult<T>,
) -> PortionResult<T> {
    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| to_storage_err(format!("begin transaction: {e}")))?;

    match f(conn) {
        Ok(value) => match conn.execute_batch("COMMIT") {
            Ok(()) => Ok(value),
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK");
                Err(to_storage_err(format!("commit: {e}")))
            }
        },
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}
