use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashSet;

/// Proof that a fetch was issued for a given parameter generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Monotonic parameter generation plus the set of generations with a fetch
/// in flight.
///
/// Every parameter change advances the generation. At most one fetch runs
/// per generation; a result is current only if its generation still is.
/// Callers serialize `advance`, `begin` and `complete` for one view.
#[derive(Debug, Default)]
pub struct RefreshController {
    generation: AtomicU64,
    in_flight: DashSet<u64>,
}

impl RefreshController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Start a new parameter generation. Returns it.
    pub fn advance(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Claim the fetch slot for the current generation. `None` when a fetch
    /// for it is already running.
    pub fn begin(&self) -> Option<FetchTicket> {
        let generation = self.generation();
        self.in_flight
            .insert(generation)
            .then_some(FetchTicket { generation })
    }

    /// Release the ticket's slot. True when its result may be applied.
    pub fn complete(&self, ticket: FetchTicket) -> bool {
        self.in_flight.remove(&ticket.generation);
        ticket.generation == self.generation()
    }

    /// Number of fetches still running, stale ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
