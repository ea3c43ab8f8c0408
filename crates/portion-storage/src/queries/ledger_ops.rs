//! Composite write paths. Callers wrap these in one transaction.

use rusqlite::Connection;
use tracing::debug;

use portion_core::models::{Deduction, Entry, EntryKind};
use portion_core::traits::OrderReceipt;
use portion_core::{PortionError, PortionResult, StorageError};

use super::entry_ops;

/// Deduct `line`'s serving from inventory row `inventory_id` and append `line`
/// to the ration log.
pub fn log_serving(conn: &Connection, inventory_id: i64, line: &Entry) -> PortionResult<Deduction> {
    let serving = line.serving.ok_or_else(|| {
        PortionError::InvalidInput("ration log line carries no serving".to_string())
    })?;
    let inventory = entry_ops::get_entry(conn, EntryKind::Inventory, inventory_id)?.ok_or_else(
        || StorageError::NotFound {
            kind: EntryKind::Inventory.to_string(),
            id: inventory_id,
        },
    )?;

    let deduction = Deduction::plan(&inventory, &serving)?;
    if deduction.exhausts() {
        entry_ops::delete_entry(conn, EntryKind::Inventory, inventory_id)?;
        debug!(inventory_id, "inventory entry used up, removed");
    } else {
        entry_ops::update_quantity(
            conn,
            inventory_id,
            deduction.remaining_volume,
            deduction.remaining_grams,
        )?;
    }

    entry_ops::insert_entry(conn, EntryKind::RationLog, line)?;
    Ok(deduction)
}

/// Append every item to the purchase history; merge primary-store items
/// into inventory keyed by (product, owner user, owner family).
pub fn record_order(
    conn: &Connection,
    items: &[Entry],
    primary_store_id: i64,
) -> PortionResult<OrderReceipt> {
    let mut receipt = OrderReceipt::default();

    for item in items {
        entry_ops::insert_entry(conn, EntryKind::Purchase, item)?;
        receipt.purchases_recorded += 1;

        if item.store_id != primary_store_id {
            continue;
        }

        let existing = entry_ops::find_inventory_match(
            conn,
            item.product_id,
            &item.owner_user_id,
            &item.owner_family_id,
        )?;

        match existing {
            Some(mut held) => {
                let id = held.id.unwrap_or_default();
                held.volume += item.volume;
                held.volume_grams += item.volume_grams;
                held.total_cost += item.total_cost;
                held.expire_date = held.expire_date.min(item.expire_date);
                entry_ops::update_entry(conn, EntryKind::Inventory, id, &held)?;
                receipt.inventory_merged += 1;
            }
            None => {
                entry_ops::insert_entry(conn, EntryKind::Inventory, item)?;
                receipt.inventory_inserted += 1;
            }
        }
    }

    Ok(receipt)
}
