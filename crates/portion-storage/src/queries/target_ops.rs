//! Raw SQL operations for the optimal_targets table.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use portion_core::models::{DateRange, Macros, OptimalTarget};
use portion_core::PortionResult;

use super::entry_ops::{parse_date, DATE_FORMAT};
use crate::to_storage_err;

pub fn get_target(conn: &Connection, date: NaiveDate) -> PortionResult<Option<OptimalTarget>> {
    conn.query_row(
        "SELECT date, kcal, protein, fat, carbs FROM optimal_targets WHERE date = ?1",
        params![date.format(DATE_FORMAT).to_string()],
        row_to_target,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Insert unless a row for the date exists. Returns true when inserted.
pub fn insert_target_if_absent(conn: &Connection, target: &OptimalTarget) -> PortionResult<bool> {
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO optimal_targets (date, kcal, protein, fat, carbs)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                target.date.format(DATE_FORMAT).to_string(),
                target.targets.kcal,
                target.targets.protein,
                target.targets.fat,
                target.targets.carbs,
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed == 1)
}

pub fn targets_between(conn: &Connection, range: DateRange) -> PortionResult<Vec<OptimalTarget>> {
    let mut stmt = conn
        .prepare(
            "SELECT date, kcal, protein, fat, carbs FROM optimal_targets
             WHERE date >= ?1 AND date <= ?2
             ORDER BY date",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(
            params![
                range.start.format(DATE_FORMAT).to_string(),
                range.end.format(DATE_FORMAT).to_string()
            ],
            row_to_target,
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

fn row_to_target(row: &Row<'_>) -> rusqlite::Result<OptimalTarget> {
    Ok(OptimalTarget {
        date: parse_date(row, 0)?,
        targets: Macros::new(row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?),
    })
}
