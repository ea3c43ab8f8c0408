use std::sync::Arc;

use chrono::NaiveDate;
use tokio::task::JoinHandle;
use tracing::warn;

use portion_core::config::RationConfig;
use portion_core::models::{Entry, EntryKind, Identity, Macros, OptimalTarget, UserProfile};
use portion_core::traits::{ILocalStore, IOptimalTargetStore, IRemoteFetcher};
use portion_core::PortionResult;

use super::aggregate::{compute_ration, RationCache};
use crate::recommendation::RecommendationTable;
use crate::reconcile::{ReconciledStore, RemoteState};
use crate::refresh::{ViewCell, ViewParams, ViewSources, ViewStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct RationParams {
    pub profile: Option<UserProfile>,
    pub date: NaiveDate,
}

impl ViewParams for RationParams {
    fn identity(&self) -> Option<&Identity> {
        self.profile.as_ref().map(|p| &p.identity)
    }
}

/// Target for `date`: the stored record, created from the profile the first
/// time the date is seen. Without a profile an existing record is used,
/// else an all-zero target. Store failures fall back to the profile values.
pub fn resolve_daily_target(
    targets: &dyn IOptimalTargetStore,
    date: NaiveDate,
    profile: Option<&UserProfile>,
) -> OptimalTarget {
    let resolved = match profile {
        Some(profile) => targets
            .get_or_create_target(&OptimalTarget::from_profile(date, profile))
            .map(Some),
        None => targets.get_target(date),
    };
    match resolved {
        Ok(Some(target)) => target,
        Ok(None) => OptimalTarget::new(date, Macros::ZERO),
        Err(err) => {
            warn!(%date, error = %err, code = err.error_code(), "daily target unavailable");
            OptimalTarget::new(date, profile.map(|p| p.targets).unwrap_or_default())
        }
    }
}

pub struct RationSources {
    entries: ReconciledStore<Entry>,
    targets: Arc<dyn IOptimalTargetStore>,
    target: OptimalTarget,
    table: RecommendationTable,
}

impl RationSources {
    pub fn new(
        local: Vec<Entry>,
        targets: Arc<dyn IOptimalTargetStore>,
        config: &RationConfig,
        date: NaiveDate,
    ) -> Self {
        Self {
            entries: ReconciledStore::new(local),
            targets,
            target: OptimalTarget::new(date, Macros::ZERO),
            table: RecommendationTable::daily(config),
        }
    }

    pub fn entries(&self) -> &ReconciledStore<Entry> {
        &self.entries
    }

    pub fn target(&self) -> OptimalTarget {
        self.target
    }
}

impl ViewSources for RationSources {
    type Params = RationParams;
    type Remote = Vec<Entry>;
    type Cache = RationCache;

    fn on_params(&mut self, params: &RationParams) {
        self.target = resolve_daily_target(&*self.targets, params.date, params.profile.as_ref());
    }

    fn apply_remote(&mut self, remote: Vec<Entry>) {
        self.entries.set_remote(remote);
    }

    fn fail_remote(&mut self) {
        self.entries.mark_failed();
    }

    fn reset_remote(&mut self) {
        self.entries.clear_remote();
    }

    fn remote_state(&self) -> RemoteState {
        self.entries.state()
    }

    fn recompute(&self, params: &RationParams) -> RationCache {
        compute_ration(self.entries.current(), params.date, &self.target, &self.table)
    }
}

/// One day of logged consumption.
pub struct RationView<F: IRemoteFetcher> {
    cell: Arc<ViewCell<RationSources>>,
    store: Arc<dyn ILocalStore>,
    fetcher: Arc<F>,
}

impl<F: IRemoteFetcher> RationView<F> {
    /// Load the local ration log and materialize the target for `date`.
    pub fn new(
        store: Arc<dyn ILocalStore>,
        targets: Arc<dyn IOptimalTargetStore>,
        fetcher: Arc<F>,
        config: &RationConfig,
        profile: Option<UserProfile>,
        date: NaiveDate,
    ) -> PortionResult<Self> {
        let local = store.list(EntryKind::RationLog)?;
        let sources = RationSources::new(local, targets, config, date);
        Ok(Self {
            cell: Arc::new(ViewCell::new(
                "ration",
                RationParams { profile, date },
                sources,
            )),
            store,
            fetcher,
        })
    }

    pub fn current(&self) -> Arc<Vec<Entry>> {
        self.cell.with_sources(|s| s.entries.current_shared())
    }

    pub fn cache(&self) -> Arc<RationCache> {
        self.cell.cache()
    }

    pub fn status(&self) -> ViewStatus {
        self.cell.status()
    }

    pub fn sourcing(&self) -> RemoteState {
        self.cell.remote_state()
    }

    pub fn params(&self) -> RationParams {
        self.cell.params()
    }

    pub fn generation(&self) -> u64 {
        self.cell.generation()
    }

    pub fn refresh(&self) -> Option<JoinHandle<()>> {
        self.refresh_with(self.cell.params())
    }

    /// Select another day and fetch it.
    pub fn select_date(&self, date: NaiveDate) -> Option<JoinHandle<()>> {
        let params = RationParams {
            date,
            ..self.cell.params()
        };
        self.refresh_with(params)
    }

    pub fn set_profile(&self, profile: Option<UserProfile>) -> Option<JoinHandle<()>> {
        let params = RationParams {
            profile,
            ..self.cell.params()
        };
        self.refresh_with(params)
    }

    fn refresh_with(&self, params: RationParams) -> Option<JoinHandle<()>> {
        let fetcher = Arc::clone(&self.fetcher);
        self.cell.refresh(params, move |identity, params| async move {
            fetcher.fetch_rations_on(&identity, params.date).await
        })
    }

    pub fn reload_local(&self) -> PortionResult<()> {
        let local = self.store.list(EntryKind::RationLog)?;
        self.cell.update_sources(|s| s.entries = ReconciledStore::new(local));
        Ok(())
    }
}
