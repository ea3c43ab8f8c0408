//! Positional-row wire format.
//!
//! Responses look like `{"status": "success", "<items>": [[...], ...]}` where
//! each row is a fixed-arity array. Rows shorter than their arity are skipped.
//! Missing or unparsable dates fall back to the caller-supplied time.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::debug;

use portion_core::models::{Entry, Macros, Meal, Serving};
use portion_core::FetchError;

pub const INVENTORY_ROW_ARITY: usize = 20;
pub const RATION_ROW_ARITY: usize = 22;
pub const PURCHASE_ROW_ARITY: usize = 20;

/// Extract the row arrays under `field` from a response body.
pub fn decode_rows(body: &str, field: &str) -> Result<Vec<Vec<Value>>, FetchError> {
    let payload: Value = serde_json::from_str(body).map_err(|e| FetchError::Decode {
        message: format!("invalid JSON: {e}"),
    })?;

    match payload.get("status").and_then(Value::as_str) {
        Some("success") => {}
        other => {
            return Err(FetchError::Decode {
                message: format!("unexpected status {other:?}"),
            })
        }
    }

    let rows = match payload.get(field) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(rows)) => rows,
        Some(_) => {
            return Err(FetchError::Decode {
                message: format!("`{field}` is not an array"),
            })
        }
    };

    Ok(rows
        .iter()
        .filter_map(|row| row.as_array().cloned())
        .collect())
}

/// Shared fields 0..=11 of every row shape.
fn product_head(row: &[Value], date_format: &str, fallback: NaiveDateTime) -> Entry {
    Entry {
        id: None,
        product_id: int_at(row, 0),
        name: str_at(row, 1),
        volume: float_at(row, 2),
        unit: str_at(row, 3),
        volume_grams: float_at(row, 4),
        per_100g: Macros::new(
            float_at(row, 5),
            float_at(row, 6),
            float_at(row, 7),
            float_at(row, 8),
        ),
        expire_date: date_at(row, 9, date_format).unwrap_or(fallback.date()),
        tag: str_at(row, 10),
        category: str_at(row, 11),
        preference: String::new(),
        recorded_at: fallback,
        owner_user_id: String::new(),
        owner_family_id: String::new(),
        store_id: 0,
        store_name: String::new(),
        total_cost: 0.0,
        serving: None,
    }
}

/// Inventory row: head, store, storeID, orderDate, totalCost, address,
/// addressID, userID, familyID.
pub fn decode_inventory_row(
    row: &[Value],
    date_format: &str,
    fallback: NaiveDateTime,
) -> Option<Entry> {
    if row.len() < INVENTORY_ROW_ARITY {
        return None;
    }
    let mut entry = product_head(row, date_format, fallback);
    entry.store_name = str_at(row, 12);
    entry.store_id = int_at(row, 13);
    entry.recorded_at = datetime_at(row, 14, date_format).unwrap_or(fallback);
    entry.total_cost = float_at(row, 15);
    entry.owner_user_id = str_at(row, 18);
    entry.owner_family_id = str_at(row, 19);
    Some(entry)
}

/// Ration row: head, mealID, mealName, rationDate, served volume, served
/// grams, served kcal/protein/fat/carbs, userID.
pub fn decode_ration_row(row: &[Value], date_format: &str, fallback: NaiveDateTime) -> Option<Entry> {
    if row.len() < RATION_ROW_ARITY {
        return None;
    }
    let mut entry = product_head(row, date_format, fallback);
    entry.recorded_at = datetime_at(row, 14, date_format).unwrap_or(fallback);
    entry.serving = Some(Serving {
        meal: Meal::from_id(int_at(row, 12)),
        served_volume: float_at(row, 15),
        served_volume_grams: float_at(row, 16),
        served: Macros::new(
            float_at(row, 17),
            float_at(row, 18),
            float_at(row, 19),
            float_at(row, 20),
        ),
    });
    entry.owner_user_id = str_at(row, 21);
    Some(entry)
}

/// Purchase row: head, store, storeID, orderDate, prefMealID, prefMeal,
/// totalCost, address, addressID.
pub fn decode_purchase_row(
    row: &[Value],
    date_format: &str,
    fallback: NaiveDateTime,
) -> Option<Entry> {
    if row.len() < PURCHASE_ROW_ARITY {
        return None;
    }
    let mut entry = product_head(row, date_format, fallback);
    entry.store_name = str_at(row, 12);
    entry.store_id = int_at(row, 13);
    entry.recorded_at = datetime_at(row, 14, date_format).unwrap_or(fallback);
    entry.preference = str_at(row, 16);
    entry.total_cost = float_at(row, 17);
    Some(entry)
}

/// Decode every row with `decode`, dropping the ones it rejects.
pub fn decode_all(
    rows: &[Vec<Value>],
    decode: impl Fn(&[Value]) -> Option<Entry>,
) -> Vec<Entry> {
    let entries: Vec<Entry> = rows.iter().filter_map(|row| decode(row)).collect();
    if entries.len() < rows.len() {
        debug!(
            skipped = rows.len() - entries.len(),
            "dropped short wire rows"
        );
    }
    entries
}

fn int_at(row: &[Value], idx: usize) -> i64 {
    match row.get(idx) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

fn float_at(row: &[Value], idx: usize) -> f64 {
    match row.get(idx) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    }
}

fn str_at(row: &[Value], idx: usize) -> String {
    match row.get(idx) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn date_at(row: &[Value], idx: usize, date_format: &str) -> Option<NaiveDate> {
    row.get(idx)
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), date_format).ok())
}

fn datetime_at(row: &[Value], idx: usize, date_format: &str) -> Option<NaiveDateTime> {
    date_at(row, idx, date_format).and_then(|d| d.and_hms_opt(0, 0, 0))
}
