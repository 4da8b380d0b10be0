//! Shared progress counter for parallel runs.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// Count of daily keys whose identifiers have been derived.
///
/// Cloning yields another handle to the same counter. Workers bump it once
/// per finished key. Readers may observe a slightly stale value; the count is
/// for observability only and never gates correctness.
///
/// Updates are `Relaxed`: seeing `completed() == n` does not mean the work
/// of those `n` keys is visible to the reader. It is not a completion
/// barrier. Wait for the run itself to return for that.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    completed: Arc<AtomicU64>,
}

impl Progress {
    /// New counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished key.
    pub fn record(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Keys finished so far. Not ordered with respect to the workers' output.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Completion as a percentage of `total` keys. An empty run is 100%.
    pub fn percent_of(&self, total: usize) -> f64 {
        if total == 0 {
            return 100.0;
        }
        self.completed() as f64 / total as f64 * 100.0
    }
}
