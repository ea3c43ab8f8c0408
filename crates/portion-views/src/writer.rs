//! The in-process write path: logging servings and recording orders.
//!
//! Writes for one identity are serialized through a per-identity async
//! mutex; different identities write independently.

use std::sync::Arc;

use chrono::NaiveDateTime;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;

use portion_core::models::{Entry, EntryKind, Identity, Meal, Serving};
use portion_core::traits::{ILocalStore, OrderReceipt};
use portion_core::{PortionResult, StorageError};

pub struct ConsumptionWriter {
    store: Arc<dyn ILocalStore>,
    locks: DashMap<Identity, Arc<Mutex<()>>>,
    primary_store_id: i64,
}

impl ConsumptionWriter {
    pub fn new(store: Arc<dyn ILocalStore>, primary_store_id: i64) -> Self {
        Self {
            store,
            locks: DashMap::new(),
            primary_store_id,
        }
    }

    fn lock_for(&self, identity: &Identity) -> Arc<Mutex<()>> {
        Arc::clone(
            self.locks
                .entry(identity.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }

    /// Serve `served_volume` of inventory row `inventory_id` for `meal` and
    /// return the ration log line that was written.
    ///
    /// Fails with `InsufficientQuantity` when the row holds less than the
    /// serving; nothing is written in that case.
    pub async fn log_serving(
        &self,
        identity: &Identity,
        inventory_id: i64,
        served_volume: f64,
        meal: Meal,
        consumed_at: NaiveDateTime,
    ) -> PortionResult<Entry> {
        let lock = self.lock_for(identity);
        let _guard = lock.lock().await;

        let source = self
            .store
            .get(EntryKind::Inventory, inventory_id)?
            .ok_or_else(|| StorageError::NotFound {
                kind: EntryKind::Inventory.to_string(),
                id: inventory_id,
            })?;
        let serving = Serving::portion(&source, served_volume, meal)?;
        let line = Entry::ration_line(&source, serving, consumed_at, identity.user_id.to_string());

        let deduction = self.store.log_serving(inventory_id, &line)?;
        info!(
            inventory_id,
            product_id = line.product_id,
            meal = meal.name(),
            grams = serving.served_volume_grams,
            kcal = serving.served.kcal,
            exhausted = deduction.exhausts(),
            "serving logged"
        );
        Ok(line)
    }

    /// Record a placed order. Items without an owner are attributed to
    /// `identity`.
    pub async fn record_order(
        &self,
        identity: &Identity,
        items: Vec<Entry>,
    ) -> PortionResult<OrderReceipt> {
        let lock = self.lock_for(identity);
        let _guard = lock.lock().await;

        let items: Vec<Entry> = items
            .into_iter()
            .map(|mut item| {
                if item.owner_user_id.is_empty() {
                    item.owner_user_id = identity.user_id.to_string();
                }
                if item.owner_family_id.is_empty() {
                    item.owner_family_id = identity.family_id().to_string();
                }
                item
            })
            .collect();

        let receipt = self.store.record_order(&items, self.primary_store_id)?;
        info!(
            purchases = receipt.purchases_recorded,
            inserted = receipt.inventory_inserted,
            merged = receipt.inventory_merged,
            "order recorded"
        );
        Ok(receipt)
    }
}
