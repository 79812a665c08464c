//! Configuration types for pipelines

use serde::{Deserialize, Serialize};

/// Buffering and sorting behaviour shared by every stage of a pipeline.
///
/// The configuration lives in the pipeline root; any stage can replace it
/// with `with_config`, and stages created afterwards read the new values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Capacity reserved up front by buffering stages (`sorted`, `distinct`)
    /// and by `to_vec` when the source size is unknown
    pub initial_capacity: usize,
    /// Use a stable sort in `sorted`; equal elements keep encounter order.
    /// The unstable sort may panic on a comparator that is not a total order.
    pub stable_sort: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            stable_sort: true,
        }
    }
}

impl StreamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial buffer capacity
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Choose between stable and unstable sorting
    pub fn stable_sort(mut self, stable: bool) -> Self {
        self.stable_sort = stable;
        self
    }

    /// Capacity to reserve for a buffer fed by a cursor with the given estimate.
    pub(crate) fn capacity_for(&self, estimate: Option<u64>) -> usize {
        match estimate {
            Some(size) => usize::try_from(size).unwrap_or(usize::MAX).min(1 << 20),
            None => self.initial_capacity,
        }
    }
}
