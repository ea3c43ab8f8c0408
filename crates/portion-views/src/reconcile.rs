//! Two-slot local/remote store with a wholesale override rule.

use std::sync::Arc;

use serde::Serialize;

/// What the remote slot currently reflects.
///
/// `current()` only looks at whether the remote slot is non-empty; this
/// state lets callers tell an empty-but-valid fetch apart from a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RemoteState {
    NotFetched,
    FetchFailed,
    FetchedEmpty,
    FetchedNonEmpty,
}

/// Latest durable snapshot plus latest successful remote snapshot for one
/// entity kind.
///
/// The two slots are never combined: `current()` is the remote slot when it
/// holds anything, otherwise the local slot.
#[derive(Debug, Clone)]
pub struct ReconciledStore<E> {
    local: Arc<Vec<E>>,
    remote: Arc<Vec<E>>,
    state: RemoteState,
}

impl<E> ReconciledStore<E> {
    pub fn new(local: Vec<E>) -> Self {
        Self {
            local: Arc::new(local),
            remote: Arc::new(Vec::new()),
            state: RemoteState::NotFetched,
        }
    }

    pub fn set_local(&mut self, entries: Vec<E>) {
        self.local = Arc::new(entries);
    }

    /// Replace the remote slot with a successful fetch result.
    pub fn set_remote(&mut self, entries: Vec<E>) {
        self.state = if entries.is_empty() {
            RemoteState::FetchedEmpty
        } else {
            RemoteState::FetchedNonEmpty
        };
        self.remote = Arc::new(entries);
    }

    /// Drop the remote slot after a parameter or identity change.
    pub fn clear_remote(&mut self) {
        self.remote = Arc::new(Vec::new());
        self.state = RemoteState::NotFetched;
    }

    /// Drop the remote slot after a failed fetch.
    pub fn mark_failed(&mut self) {
        self.remote = Arc::new(Vec::new());
        self.state = RemoteState::FetchFailed;
    }

    pub fn current(&self) -> &[E] {
        if self.remote.is_empty() {
            self.local.as_slice()
        } else {
            self.remote.as_slice()
        }
    }

    /// `current()` as a shared snapshot that outlives the borrow.
    pub fn current_shared(&self) -> Arc<Vec<E>> {
        if self.remote.is_empty() {
            Arc::clone(&self.local)
        } else {
            Arc::clone(&self.remote)
        }
    }

    pub fn local(&self) -> &[E] {
        self.local.as_slice()
    }

    pub fn remote(&self) -> &[E] {
        self.remote.as_slice()
    }

    pub fn state(&self) -> RemoteState {
        self.state
    }

    pub fn serves_remote(&self) -> bool {
        !self.remote.is_empty()
    }
}

impl<E> Default for ReconciledStore<E> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
