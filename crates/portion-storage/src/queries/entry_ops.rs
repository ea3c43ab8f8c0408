//! Raw SQL operations for the entries table.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use portion_core::models::{Entry, EntryKind, Macros, Meal, Serving};
use portion_core::PortionResult;

use crate::to_storage_err;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const ENTRY_COLUMNS: &str = "id, product_id, name, volume, unit, volume_grams,
    kcal_100g, protein_100g, fat_100g, carbs_100g, tag, category, preference,
    expire_date, recorded_at, owner_user_id, owner_family_id, store_id, store_name,
    total_cost, meal_id, served_volume, served_grams, kcal_served, protein_served,
    fat_served, carbs_served";

/// All entries of `kind`, oldest row first.
pub fn list_entries(conn: &Connection, kind: EntryKind) -> PortionResult<Vec<Entry>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE kind = ?1 ORDER BY id"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![kind.as_str()], row_to_entry)
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn get_entry(conn: &Connection, kind: EntryKind, id: i64) -> PortionResult<Option<Entry>> {
    conn.query_row(
        &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE kind = ?1 AND id = ?2"),
        params![kind.as_str(), id],
        row_to_entry,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Inventory row holding the same product for the same owner, if any.
pub fn find_inventory_match(
    conn: &Connection,
    product_id: i64,
    owner_user_id: &str,
    owner_family_id: &str,
) -> PortionResult<Option<Entry>> {
    conn.query_row(
        &format!(
            "SELECT {ENTRY_COLUMNS} FROM entries
             WHERE kind = ?1 AND product_id = ?2 AND owner_user_id = ?3 AND owner_family_id = ?4
             ORDER BY id LIMIT 1"
        ),
        params![
            EntryKind::Inventory.as_str(),
            product_id,
            owner_user_id,
            owner_family_id
        ],
        row_to_entry,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Insert an entry. Returns the assigned row id.
pub fn insert_entry(conn: &Connection, kind: EntryKind, entry: &Entry) -> PortionResult<i64> {
    let serving = entry.serving;
    conn.execute(
        "INSERT INTO entries (kind, product_id, name, volume, unit, volume_grams,
             kcal_100g, protein_100g, fat_100g, carbs_100g, tag, category, preference,
             expire_date, recorded_at, owner_user_id, owner_family_id, store_id, store_name,
             total_cost, meal_id, served_volume, served_grams, kcal_served, protein_served,
             fat_served, carbs_served)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                 ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27)",
        params![
            kind.as_str(),
            entry.product_id,
            entry.name,
            entry.volume,
            entry.unit,
            entry.volume_grams,
            entry.per_100g.kcal,
            entry.per_100g.protein,
            entry.per_100g.fat,
            entry.per_100g.carbs,
            entry.tag,
            entry.category,
            entry.preference,
            entry.expire_date.format(DATE_FORMAT).to_string(),
            entry.recorded_at.format(TIMESTAMP_FORMAT).to_string(),
            entry.owner_user_id,
            entry.owner_family_id,
            entry.store_id,
            entry.store_name,
            entry.total_cost,
            serving.map(|s| s.meal.id()),
            serving.map(|s| s.served_volume),
            serving.map(|s| s.served_volume_grams),
            serving.map(|s| s.served.kcal),
            serving.map(|s| s.served.protein),
            serving.map(|s| s.served.fat),
            serving.map(|s| s.served.carbs),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(conn.last_insert_rowid())
}

/// Overwrite every column of row `id`. Returns the number of rows changed.
pub fn update_entry(
    conn: &Connection,
    kind: EntryKind,
    id: i64,
    entry: &Entry,
) -> PortionResult<usize> {
    let serving = entry.serving;
    conn.execute(
        "UPDATE entries SET product_id = ?3, name = ?4, volume = ?5, unit = ?6,
             volume_grams = ?7, kcal_100g = ?8, protein_100g = ?9, fat_100g = ?10,
             carbs_100g = ?11, tag = ?12, category = ?13, preference = ?14,
             expire_date = ?15, recorded_at = ?16, owner_user_id = ?17,
             owner_family_id = ?18, store_id = ?19, store_name = ?20, total_cost = ?21,
             meal_id = ?22, served_volume = ?23, served_grams = ?24, kcal_served = ?25,
             protein_served = ?26, fat_served = ?27, carbs_served = ?28
         WHERE kind = ?1 AND id = ?2",
        params![
            kind.as_str(),
            id,
            entry.product_id,
            entry.name,
            entry.volume,
            entry.unit,
            entry.volume_grams,
            entry.per_100g.kcal,
            entry.per_100g.protein,
            entry.per_100g.fat,
            entry.per_100g.carbs,
            entry.tag,
            entry.category,
            entry.preference,
            entry.expire_date.format(DATE_FORMAT).to_string(),
            entry.recorded_at.format(TIMESTAMP_FORMAT).to_string(),
            entry.owner_user_id,
            entry.owner_family_id,
            entry.store_id,
            entry.store_name,
            entry.total_cost,
            serving.map(|s| s.meal.id()),
            serving.map(|s| s.served_volume),
            serving.map(|s| s.served_volume_grams),
            serving.map(|s| s.served.kcal),
            serving.map(|s| s.served.protein),
            serving.map(|s| s.served.fat),
            serving.map(|s| s.served.carbs),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Set the held quantity of an inventory row.
pub fn update_quantity(
    conn: &Connection,
    id: i64,
    volume: f64,
    volume_grams: f64,
) -> PortionResult<usize> {
    conn.execute(
        "UPDATE entries SET volume = ?2, volume_grams = ?3 WHERE kind = ?1 AND id = ?4",
        params![EntryKind::Inventory.as_str(), volume, volume_grams, id],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Delete row `id`. Returns the number of rows removed.
pub fn delete_entry(conn: &Connection, kind: EntryKind, id: i64) -> PortionResult<usize> {
    conn.execute(
        "DELETE FROM entries WHERE kind = ?1 AND id = ?2",
        params![kind.as_str(), id],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<Entry> {
    let meal_id: Option<i64> = row.get(20)?;
    let serving = match meal_id {
        Some(meal) => Some(Serving {
            meal: Meal::from_id(meal),
            served_volume: row.get::<_, Option<f64>>(21)?.unwrap_or_default(),
            served_volume_grams: row.get::<_, Option<f64>>(22)?.unwrap_or_default(),
            served: Macros::new(
                row.get::<_, Option<f64>>(23)?.unwrap_or_default(),
                row.get::<_, Option<f64>>(24)?.unwrap_or_default(),
                row.get::<_, Option<f64>>(25)?.unwrap_or_default(),
                row.get::<_, Option<f64>>(26)?.unwrap_or_default(),
            ),
        }),
        None => None,
    };

    Ok(Entry {
        id: Some(row.get(0)?),
        product_id: row.get(1)?,
        name: row.get(2)?,
        volume: row.get(3)?,
        unit: row.get(4)?,
        volume_grams: row.get(5)?,
        per_100g: Macros::new(row.get(6)?, row.get(7)?, row.get(8)?, row.get(9)?),
        tag: row.get(10)?,
        category: row.get(11)?,
        preference: row.get(12)?,
        expire_date: parse_date(row, 13)?,
        recorded_at: parse_timestamp(row, 14)?,
        owner_user_id: row.get(15)?,
        owner_family_id: row.get(16)?,
        store_id: row.get(17)?,
        store_name: row.get(18)?,
        total_cost: row.get(19)?,
        serving,
    })
}

pub(crate) fn parse_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
