use std::sync::Arc;

use chrono::NaiveDate;
use tokio::task::JoinHandle;
use tracing::warn;

use portion_core::config::StatisticsConfig;
use portion_core::models::{
    DateRange, Entry, EntryKind, Identity, OptimalTarget, Period, UserProfile,
};
use portion_core::traits::{ILocalStore, IOptimalTargetStore, IRemoteFetcher};
use portion_core::PortionResult;

use super::aggregate::{compute_statistics, StatisticsCache, StatisticsInputs};
use crate::recommendation::RecommendationTable;
use crate::reconcile::{ReconciledStore, RemoteState};
use crate::refresh::{ViewCell, ViewParams, ViewSources, ViewStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsParams {
    pub profile: Option<UserProfile>,
    pub period: Period,
    /// Any day inside the period to report on.
    pub reference: NaiveDate,
}

impl StatisticsParams {
    pub fn range(&self) -> DateRange {
        self.period.bounds(self.reference)
    }
}

impl ViewParams for StatisticsParams {
    fn identity(&self) -> Option<&Identity> {
        self.profile.as_ref().map(|p| &p.identity)
    }
}

pub struct StatisticsSources {
    rations: ReconciledStore<Entry>,
    purchases: ReconciledStore<Entry>,
    targets: Arc<dyn IOptimalTargetStore>,
    day_targets: Vec<OptimalTarget>,
    config: StatisticsConfig,
    table: RecommendationTable,
}

impl StatisticsSources {
    pub fn new(
        rations: Vec<Entry>,
        purchases: Vec<Entry>,
        targets: Arc<dyn IOptimalTargetStore>,
        config: StatisticsConfig,
    ) -> Self {
        let table = RecommendationTable::period(&config);
        Self {
            rations: ReconciledStore::new(rations),
            purchases: ReconciledStore::new(purchases),
            targets,
            day_targets: Vec::new(),
            config,
            table,
        }
    }

    pub fn rations(&self) -> &ReconciledStore<Entry> {
        &self.rations
    }

    pub fn purchases(&self) -> &ReconciledStore<Entry> {
        &self.purchases
    }

    pub fn day_targets(&self) -> &[OptimalTarget] {
        &self.day_targets
    }
}

impl ViewSources for StatisticsSources {
    type Params = StatisticsParams;
    type Remote = (Vec<Entry>, Vec<Entry>);
    type Cache = StatisticsCache;

    fn on_params(&mut self, params: &StatisticsParams) {
        let range = params.range();
        self.day_targets = match self.targets.targets_in(range) {
            Ok(targets) => targets,
            Err(err) => {
                warn!(
                    start = %range.start,
                    end = %range.end,
                    error = %err,
                    code = err.error_code(),
                    "period targets unavailable"
                );
                Vec::new()
            }
        };
    }

    fn apply_remote(&mut self, (rations, purchases): (Vec<Entry>, Vec<Entry>)) {
        self.rations.set_remote(rations);
        self.purchases.set_remote(purchases);
    }

    fn fail_remote(&mut self) {
        self.rations.mark_failed();
        self.purchases.mark_failed();
    }

    fn reset_remote(&mut self) {
        self.rations.clear_remote();
        self.purchases.clear_remote();
    }

    /// Both kinds are fetched together, so they share a state unless one
    /// of them came back empty.
    fn remote_state(&self) -> RemoteState {
        match (self.rations.state(), self.purchases.state()) {
            (RemoteState::FetchedNonEmpty, _) | (_, RemoteState::FetchedNonEmpty) => {
                RemoteState::FetchedNonEmpty
            }
            (state, _) => state,
        }
    }

    fn recompute(&self, params: &StatisticsParams) -> StatisticsCache {
        compute_statistics(
            StatisticsInputs {
                rations: self.rations.current(),
                purchases: self.purchases.current(),
                range: params.range(),
                day_targets: &self.day_targets,
                profile_targets: params.profile.as_ref().map(|p| p.targets),
            },
            &self.config,
            &self.table,
        )
    }
}

/// Week, month or year summary of consumption and spending.
pub struct StatisticsView<F: IRemoteFetcher> {
    cell: Arc<ViewCell<StatisticsSources>>,
    store: Arc<dyn ILocalStore>,
    fetcher: Arc<F>,
}

impl<F: IRemoteFetcher> StatisticsView<F> {
    pub fn new(
        store: Arc<dyn ILocalStore>,
        targets: Arc<dyn IOptimalTargetStore>,
        fetcher: Arc<F>,
        config: StatisticsConfig,
        profile: Option<UserProfile>,
        period: Period,
        reference: NaiveDate,
    ) -> PortionResult<Self> {
        let rations = store.list(EntryKind::RationLog)?;
        let purchases = store.list(EntryKind::Purchase)?;
        let sources = StatisticsSources::new(rations, purchases, targets, config);
        let params = StatisticsParams {
            profile,
            period,
            reference,
        };
        Ok(Self {
            cell: Arc::new(ViewCell::new("statistics", params, sources)),
            store,
            fetcher,
        })
    }

    pub fn rations(&self) -> Arc<Vec<Entry>> {
        self.cell.with_sources(|s| s.rations.current_shared())
    }

    pub fn purchases(&self) -> Arc<Vec<Entry>> {
        self.cell.with_sources(|s| s.purchases.current_shared())
    }

    /// Stored per-day targets inside the current period, as last read.
    pub fn day_targets(&self) -> Vec<OptimalTarget> {
        self.cell.with_sources(|s| s.day_targets.clone())
    }

    pub fn cache(&self) -> Arc<StatisticsCache> {
        self.cell.cache()
    }

    pub fn status(&self) -> ViewStatus {
        self.cell.status()
    }

    pub fn sourcing(&self) -> RemoteState {
        self.cell.remote_state()
    }

    pub fn params(&self) -> StatisticsParams {
        self.cell.params()
    }

    pub fn generation(&self) -> u64 {
        self.cell.generation()
    }

    pub fn refresh(&self) -> Option<JoinHandle<()>> {
        self.refresh_with(self.cell.params())
    }

    pub fn select_period(&self, period: Period) -> Option<JoinHandle<()>> {
        let params = StatisticsParams {
            period,
            ..self.cell.params()
        };
        self.refresh_with(params)
    }

    /// Move to the period containing `reference`.
    pub fn select_reference(&self, reference: NaiveDate) -> Option<JoinHandle<()>> {
        let params = StatisticsParams {
            reference,
            ..self.cell.params()
        };
        self.refresh_with(params)
    }

    pub fn set_profile(&self, profile: Option<UserProfile>) -> Option<JoinHandle<()>> {
        let params = StatisticsParams {
            profile,
            ..self.cell.params()
        };
        self.refresh_with(params)
    }

    fn refresh_with(&self, params: StatisticsParams) -> Option<JoinHandle<()>> {
        let fetcher = Arc::clone(&self.fetcher);
        self.cell.refresh(params, move |identity, params| async move {
            let range = params.range();
            tokio::try_join!(
                fetcher.fetch_rations_between(&identity, range),
                fetcher.fetch_purchases_between(&identity, range),
            )
        })
    }

    /// Rebuild both stores from durable storage.
    pub fn reload_local(&self) -> PortionResult<()> {
        let rations = self.store.list(EntryKind::RationLog)?;
        let purchases = self.store.list(EntryKind::Purchase)?;
        self.cell.update_sources(|s| {
            s.rations = ReconciledStore::new(rations);
            s.purchases = ReconciledStore::new(purchases);
        });
        Ok(())
    }
}
