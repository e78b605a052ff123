//! Cancellation and deadline primitives shared between a search and its owner.
//!
//! Cancellation is cooperative and generation based: every search session
//! holds the generation it was started under, and is cancelled as soon as the
//! shared counter moves past it. Starting a new session therefore cancels the
//! previous one without any extra signalling.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

/// Shared generation counter for one logical search session.
#[derive(Debug, Default)]
pub struct SharedSearchState {
    generation: AtomicU64,
}

impl SharedSearchState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Start a new generation, invalidating whichever one was current.
    #[inline]
    pub fn begin_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Cancel `generation` if it is still current. Returns false when it was
    /// already superseded.
    #[inline]
    pub fn cancel_generation(&self, generation: u64) -> bool {
        self.generation
            .compare_exchange(generation, generation + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    #[inline]
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

/// Handle a running search polls to learn whether it has been cancelled.
#[derive(Debug, Clone)]
pub struct SearchCancellation {
    shared: Arc<SharedSearchState>,
    generation: u64,
}

impl SearchCancellation {
    /// Standalone token with its own counter.
    pub fn new() -> Self {
        let shared = SharedSearchState::new();
        let generation = shared.begin_generation();
        Self { shared, generation }
    }

    #[inline]
    pub fn for_generation(shared: Arc<SharedSearchState>, generation: u64) -> Self {
        Self { shared, generation }
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn cancel(&self) {
        self.shared.cancel_generation(self.generation);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.shared.current_generation() != self.generation
    }
}

impl Default for SearchCancellation {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock deadline fixed once at search start, plus the cancellation handle.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    deadline: Instant,
    cancellation: SearchCancellation,
}

impl SearchLimits {
    pub fn new(time_budget: Duration, cancellation: SearchCancellation) -> Self {
        Self {
            deadline: Instant::now() + time_budget,
            cancellation,
        }
    }

    #[inline]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    #[inline]
    pub fn time_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.is_cancelled() || self.time_expired()
    }
}
