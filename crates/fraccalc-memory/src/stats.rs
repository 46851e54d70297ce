//! Slot arena usage statistics.

use serde::Serialize;

/// Statistics for slot arena usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Slots handed out again from the free-list.
    pub reused: u64,
    /// Slots handed out for the first time.
    pub fresh: u64,
    /// Slots returned to the free-list.
    pub released: u64,
    /// Storage buffers allocated, including the initial one.
    pub buffers_allocated: u64,
}

impl PoolStats {
    /// Create new zeroed stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the reuse counter.
    pub fn record_reuse(&mut self) {
        self.reused += 1;
    }

    /// Increment the fresh-slot counter.
    pub fn record_fresh(&mut self) {
        self.fresh += 1;
    }

    /// Increment the release counter.
    pub fn record_release(&mut self) {
        self.released += 1;
    }

    /// Increment the buffer allocation counter.
    pub fn record_buffer(&mut self) {
        self.buffers_allocated += 1;
    }

    /// Total number of successful acquisitions.
    #[must_use]
    pub fn acquired(&self) -> u64 {
        self.reused + self.fresh
    }
}
