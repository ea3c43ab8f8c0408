use std::fmt::Debug;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use portion_core::models::Identity;
use portion_core::FetchError;

use super::controller::{FetchTicket, RefreshController};
use crate::reconcile::RemoteState;

/// Lifecycle of a view's latest fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViewStatus {
    /// No fetch issued yet.
    Idle,
    Fetching,
    /// Last fetch for the current parameters succeeded.
    Ready,
    /// Last fetch failed or could not be issued; local data is served.
    Degraded,
}

/// Parameters a view's cache depends on. Any change starts a new generation.
pub trait ViewParams: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Identity to fetch for; `None` short-circuits fetching.
    fn identity(&self) -> Option<&Identity>;
}

/// The data a view aggregates over and how to fold fetch outcomes into it.
pub trait ViewSources: Send + Sync + 'static {
    type Params: ViewParams;
    type Remote: Send + 'static;
    type Cache: Send + Sync + 'static;

    /// Re-reads local state that depends on `params`. Runs at construction,
    /// on every refresh and after every local reload, before recompute.
    fn on_params(&mut self, _params: &Self::Params) {}

    fn apply_remote(&mut self, remote: Self::Remote);

    fn fail_remote(&mut self);

    fn reset_remote(&mut self);

    fn remote_state(&self) -> RemoteState;

    /// Pure function of the sources and `params`.
    fn recompute(&self, params: &Self::Params) -> Self::Cache;
}

struct CellState<S: ViewSources> {
    params: S::Params,
    sources: S,
    status: ViewStatus,
    cache: Arc<S::Cache>,
}

impl<S: ViewSources> CellState<S> {
    fn recompute(&mut self) {
        self.cache = Arc::new(self.sources.recompute(&self.params));
    }

    fn sync_params(&mut self) {
        self.sources.on_params(&self.params);
    }
}

/// One view: sources, parameters, status and the aggregate cache.
///
/// All state sits behind one lock. The cache is replaced as a whole and
/// readers get an `Arc` snapshot, so no partial update is ever visible.
pub struct ViewCell<S: ViewSources> {
    kind: &'static str,
    state: RwLock<CellState<S>>,
    controller: RefreshController,
}

impl<S: ViewSources> ViewCell<S> {
    pub fn new(kind: &'static str, params: S::Params, mut sources: S) -> Self {
        sources.on_params(&params);
        let cache = Arc::new(sources.recompute(&params));
        Self {
            kind,
            state: RwLock::new(CellState {
                params,
                sources,
                status: ViewStatus::Idle,
                cache,
            }),
            controller: RefreshController::new(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CellState<S>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CellState<S>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn cache(&self) -> Arc<S::Cache> {
        Arc::clone(&self.read().cache)
    }

    pub fn status(&self) -> ViewStatus {
        self.read().status
    }

    pub fn params(&self) -> S::Params {
        self.read().params.clone()
    }

    pub fn remote_state(&self) -> RemoteState {
        self.read().sources.remote_state()
    }

    pub fn generation(&self) -> u64 {
        self.controller.generation()
    }

    /// Read the sources under the lock.
    pub fn with_sources<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.read().sources)
    }

    /// Mutate the sources and recompute the cache.
    ///
    /// Starts a new generation, so a fetch issued before the change can no
    /// longer land on top of it and the next refresh fetches again. The
    /// status drops back to `Idle` until that refresh resolves.
    pub fn update_sources(&self, f: impl FnOnce(&mut S)) {
        let mut state = self.write();
        let generation = self.controller.advance();
        f(&mut state.sources);
        state.status = ViewStatus::Idle;
        state.sync_params();
        state.recompute();
        debug!(kind = self.kind, generation, "local sources replaced");
    }

    /// Move to `params` and start a background fetch for them.
    ///
    /// Changing parameters resets the remote slot. Parameter-dependent local
    /// state is re-read and the cache recomputed right away, so readers see
    /// local data for the new parameters while the fetch runs. Returns
    /// `None` when no fetch was started: no identity, no runtime, or a
    /// fetch for these parameters is already in flight.
    pub fn refresh<Fut>(
        self: &Arc<Self>,
        params: S::Params,
        fetch: impl FnOnce(Identity, S::Params) -> Fut,
    ) -> Option<JoinHandle<()>>
    where
        Fut: Future<Output = Result<S::Remote, FetchError>> + Send + 'static,
    {
        let (ticket, runtime, identity, params) = {
            let mut state = self.write();
            let changed = state.params != params;
            if changed {
                let generation = self.controller.advance();
                state.sources.reset_remote();
                state.params = params;
                debug!(kind = self.kind, generation, "view parameters changed");
            }
            state.sync_params();

            let Some(identity) = state.params.identity().cloned() else {
                warn!(kind = self.kind, "no identity, serving local data");
                state.sources.reset_remote();
                state.status = ViewStatus::Degraded;
                state.recompute();
                return None;
            };

            let Ok(runtime) = Handle::try_current() else {
                warn!(kind = self.kind, "no async runtime, serving local data");
                state.sources.fail_remote();
                state.status = ViewStatus::Degraded;
                state.recompute();
                return None;
            };

            let Some(ticket) = self.controller.begin() else {
                debug!(
                    kind = self.kind,
                    generation = self.controller.generation(),
                    "fetch already in flight"
                );
                state.recompute();
                return None;
            };

            state.status = ViewStatus::Fetching;
            state.recompute();
            (ticket, runtime, identity, state.params.clone())
        };

        let pending = fetch(identity, params);
        let cell = Arc::clone(self);
        Some(runtime.spawn(async move {
            let outcome = pending.await;
            cell.resolve(ticket, outcome);
        }))
    }

    fn resolve(&self, ticket: FetchTicket, outcome: Result<S::Remote, FetchError>) {
        let mut state = self.write();
        if !self.controller.complete(ticket) {
            debug!(
                kind = self.kind,
                generation = ticket.generation(),
                current = self.controller.generation(),
                "discarding stale fetch result"
            );
            return;
        }

        match outcome {
            Ok(remote) => {
                state.sources.apply_remote(remote);
                state.status = ViewStatus::Ready;
            }
            Err(err) => {
                warn!(
                    kind = self.kind,
                    generation = ticket.generation(),
                    error = %err,
                    "remote fetch failed, degrading to local data"
                );
                state.sources.fail_remote();
                state.status = ViewStatus::Degraded;
            }
        }
        state.recompute();
        debug!(
            kind = self.kind,
            generation = ticket.generation(),
            remote = ?state.sources.remote_state(),
            "view recomputed"
        );
    }
}
