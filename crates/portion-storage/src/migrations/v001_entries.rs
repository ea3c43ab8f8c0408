//! v001: schema_version and the shared entries table.

use rusqlite::Connection;

use portion_core::errors::PortionResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PortionResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS entries (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            kind             TEXT NOT NULL,
            product_id       INTEGER NOT NULL,
            name             TEXT NOT NULL,
            volume           REAL NOT NULL DEFAULT 0,
            unit             TEXT NOT NULL DEFAULT '',
            volume_grams     REAL NOT NULL DEFAULT 0,
            kcal_100g        REAL NOT NULL DEFAULT 0,
            protein_100g     REAL NOT NULL DEFAULT 0,
            fat_100g         REAL NOT NULL DEFAULT 0,
            carbs_100g       REAL NOT NULL DEFAULT 0,
            tag              TEXT NOT NULL DEFAULT '',
            category         TEXT NOT NULL DEFAULT '',
            preference       TEXT NOT NULL DEFAULT '',
            expire_date      TEXT NOT NULL,
            recorded_at      TEXT NOT NULL,
            owner_user_id    TEXT NOT NULL DEFAULT '',
            owner_family_id  TEXT NOT NULL DEFAULT '',
            store_id         INTEGER NOT NULL DEFAULT 0,
            store_name       TEXT NOT NULL DEFAULT '',
            total_cost       REAL NOT NULL DEFAULT 0,
            meal_id          INTEGER,
            served_volume    REAL,
            served_grams     REAL,
            kcal_served      REAL,
            protein_served   REAL,
            fat_served       REAL,
            carbs_served     REAL
        );

        CREATE INDEX IF NOT EXISTS idx_entries_kind
            ON entries(kind);
        CREATE INDEX IF NOT EXISTS idx_entries_kind_recorded
            ON entries(kind, recorded_at);
        CREATE INDEX IF NOT EXISTS idx_entries_owner
            ON entries(kind, product_id, owner_user_id, owner_family_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
