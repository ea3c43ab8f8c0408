//! Household: owns the three views and the write path.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::task::JoinHandle;
use tracing::{info, warn};

use portion_core::models::{Entry, Identity, Meal, Period, UserProfile};
use portion_core::traits::{ILocalStore, IOptimalTargetStore, IRemoteFetcher, OrderReceipt};
use portion_core::{PortionConfig, PortionError, PortionResult};

use crate::clock::Clock;
use crate::inventory::InventoryView;
use crate::ration::RationView;
use crate::statistics::StatisticsView;
use crate::writer::ConsumptionWriter;

/// Result of a write plus the refreshes it fired.
#[derive(Debug)]
pub struct WriteOutcome<T> {
    pub value: T,
    pub refreshes: Vec<JoinHandle<()>>,
}

/// One signed-in household: local store, remote fetcher, the inventory,
/// ration and statistics views, and the single-writer write path.
///
/// The profile is passed explicitly to every view; switching it moves all
/// views to the new identity.
pub struct Household<F: IRemoteFetcher> {
    inventory: InventoryView<F>,
    ration: RationView<F>,
    statistics: StatisticsView<F>,
    writer: ConsumptionWriter,
    clock: Arc<dyn Clock>,
    profile: RwLock<Option<UserProfile>>,
}

impl<F: IRemoteFetcher> Household<F> {
    /// Build every view from durable storage. The ration view starts on
    /// today, the statistics view on the current week. No fetch is started.
    pub fn new<S>(
        store: Arc<S>,
        fetcher: F,
        config: &PortionConfig,
        clock: Arc<dyn Clock>,
        profile: Option<UserProfile>,
    ) -> PortionResult<Self>
    where
        S: ILocalStore + IOptimalTargetStore + 'static,
    {
        let local: Arc<dyn ILocalStore> = store.clone();
        let targets: Arc<dyn IOptimalTargetStore> = store;
        let fetcher = Arc::new(fetcher);
        let today = clock.today();

        let inventory = InventoryView::new(
            Arc::clone(&local),
            Arc::clone(&fetcher),
            config.inventory.clone(),
            Arc::clone(&clock),
            profile.clone(),
        )?;
        let ration = RationView::new(
            Arc::clone(&local),
            Arc::clone(&targets),
            Arc::clone(&fetcher),
            &config.ration,
            profile.clone(),
            today,
        )?;
        let statistics = StatisticsView::new(
            Arc::clone(&local),
            targets,
            fetcher,
            config.statistics.clone(),
            profile.clone(),
            Period::Week,
            today,
        )?;

        Ok(Self {
            inventory,
            ration,
            statistics,
            writer: ConsumptionWriter::new(local, config.statistics.primary_store_id),
            clock,
            profile: RwLock::new(profile),
        })
    }

    pub fn inventory(&self) -> &InventoryView<F> {
        &self.inventory
    }

    pub fn ration(&self) -> &RationView<F> {
        &self.ration
    }

    pub fn statistics(&self) -> &StatisticsView<F> {
        &self.statistics
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.profile
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn identity_for(&self, operation: &str) -> PortionResult<Identity> {
        self.profile()
            .map(|p| p.identity)
            .ok_or_else(|| PortionError::NoIdentity {
                operation: operation.to_string(),
            })
    }

    /// Fetch every view for its current parameters.
    pub fn refresh_all(&self) -> Vec<JoinHandle<()>> {
        [
            self.inventory.refresh(),
            self.ration.refresh(),
            self.statistics.refresh(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Switch to another profile or account. Remote data of the old
    /// identity is dropped from every view before the new fetches start.
    pub fn switch_profile(&self, profile: Option<UserProfile>) -> Vec<JoinHandle<()>> {
        *self.profile.write().unwrap_or_else(PoisonError::into_inner) = profile.clone();
        info!(
            signed_in = profile.is_some(),
            family = profile.as_ref().is_some_and(|p| p.identity.is_family()),
            "profile switched"
        );
        [
            self.inventory.set_profile(profile.clone()),
            self.ration.set_profile(profile.clone()),
            self.statistics.set_profile(profile),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Eat `served_volume` of an inventory item now.
    pub async fn log_serving(
        &self,
        inventory_id: i64,
        served_volume: f64,
        meal: Meal,
    ) -> PortionResult<WriteOutcome<Entry>> {
        let identity = self.identity_for("log_serving")?;
        let line = self
            .writer
            .log_serving(&identity, inventory_id, served_volume, meal, self.clock.now())
            .await?;

        self.reload("inventory", self.inventory.reload_local());
        self.reload("ration", self.ration.reload_local());
        self.reload("statistics", self.statistics.reload_local());
        Ok(WriteOutcome {
            value: line,
            refreshes: self.refresh_all(),
        })
    }

    /// Record a placed order into purchase history and inventory.
    pub async fn record_order(&self, items: Vec<Entry>) -> PortionResult<WriteOutcome<OrderReceipt>> {
        let identity = self.identity_for("record_order")?;
        let receipt = self.writer.record_order(&identity, items).await?;

        self.reload("inventory", self.inventory.reload_local());
        self.reload("statistics", self.statistics.reload_local());
        let refreshes = [self.inventory.refresh(), self.statistics.refresh()]
            .into_iter()
            .flatten()
            .collect();
        Ok(WriteOutcome {
            value: receipt,
            refreshes,
        })
    }

    /// The write is already committed; a failed reload only leaves the view stale.
    fn reload(&self, kind: &'static str, outcome: PortionResult<()>) {
        if let Err(err) = outcome {
            warn!(kind, error = %err, code = err.error_code(), "local reload failed");
        }
    }
}
