//! Inventory (fridge) view: expiry partition, category and preference
//! groups, nutrition totals, rations remaining and the family owner split.

mod aggregate;
mod view;

pub use aggregate::{
    compute_inventory, full_rations_remaining, group_by_category, group_by_owner,
    group_by_preference, partition, totals, unique_owner_count, ExpiryWindow, InventoryCache,
    OwnerBreakdown,
};
pub use view::{InventoryParams, InventorySources, InventoryView};
