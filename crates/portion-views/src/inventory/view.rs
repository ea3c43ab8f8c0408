use std::sync::Arc;

use tokio::task::JoinHandle;

use portion_core::config::InventoryConfig;
use portion_core::models::{Entry, EntryKind, Identity, UserProfile};
use portion_core::traits::{ILocalStore, IRemoteFetcher};
use portion_core::PortionResult;

use super::aggregate::{compute_inventory, InventoryCache};
use crate::clock::Clock;
use crate::reconcile::{ReconciledStore, RemoteState};
use crate::refresh::{ViewCell, ViewParams, ViewSources, ViewStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryParams {
    pub profile: Option<UserProfile>,
}

impl ViewParams for InventoryParams {
    fn identity(&self) -> Option<&Identity> {
        self.profile.as_ref().map(|p| &p.identity)
    }
}

pub struct InventorySources {
    entries: ReconciledStore<Entry>,
    config: InventoryConfig,
    clock: Arc<dyn Clock>,
}

impl InventorySources {
    pub fn new(local: Vec<Entry>, config: InventoryConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: ReconciledStore::new(local),
            config,
            clock,
        }
    }

    pub fn entries(&self) -> &ReconciledStore<Entry> {
        &self.entries
    }
}

impl ViewSources for InventorySources {
    type Params = InventoryParams;
    type Remote = Vec<Entry>;
    type Cache = InventoryCache;

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

    fn recompute(&self, params: &InventoryParams) -> InventoryCache {
        compute_inventory(
            self.entries.current(),
            params.profile.as_ref(),
            &self.config,
            self.clock.today(),
        )
    }
}

/// The household's current food stock.
pub struct InventoryView<F: IRemoteFetcher> {
    cell: Arc<ViewCell<InventorySources>>,
    store: Arc<dyn ILocalStore>,
    fetcher: Arc<F>,
}

impl<F: IRemoteFetcher> InventoryView<F> {
    /// Load local inventory from `store`; no fetch is started.
    pub fn new(
        store: Arc<dyn ILocalStore>,
        fetcher: Arc<F>,
        config: InventoryConfig,
        clock: Arc<dyn Clock>,
        profile: Option<UserProfile>,
    ) -> PortionResult<Self> {
        let local = store.list(EntryKind::Inventory)?;
        let sources = InventorySources::new(local, config, clock);
        Ok(Self {
            cell: Arc::new(ViewCell::new(
                "inventory",
                InventoryParams { profile },
                sources,
            )),
            store,
            fetcher,
        })
    }

    pub fn current(&self) -> Arc<Vec<Entry>> {
        self.cell.with_sources(|s| s.entries.current_shared())
    }

    pub fn cache(&self) -> Arc<InventoryCache> {
        self.cell.cache()
    }

    pub fn status(&self) -> ViewStatus {
        self.cell.status()
    }

    pub fn sourcing(&self) -> RemoteState {
        self.cell.remote_state()
    }

    pub fn params(&self) -> InventoryParams {
        self.cell.params()
    }

    /// Re-fetch for the current parameters.
    pub fn refresh(&self) -> Option<JoinHandle<()>> {
        self.refresh_with(self.cell.params())
    }

    /// Switch account or profile, then fetch for it.
    pub fn set_profile(&self, profile: Option<UserProfile>) -> Option<JoinHandle<()>> {
        self.refresh_with(InventoryParams { profile })
    }

    fn refresh_with(&self, params: InventoryParams) -> Option<JoinHandle<()>> {
        let fetcher = Arc::clone(&self.fetcher);
        self.cell.refresh(params, move |identity, _| async move {
            fetcher.fetch_inventory(&identity).await
        })
    }

    /// Rebuild the local slot from durable storage. The remote slot is dropped.
    pub fn reload_local(&self) -> PortionResult<()> {
        let local = self.store.list(EntryKind::Inventory)?;
        self.cell.update_sources(|s| s.entries = ReconciledStore::new(local));
        Ok(())
    }
}
