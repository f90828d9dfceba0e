//! Search statistics collection.
//!
//! Pruning discards are diagnostics, not failures; every combine call
//! reports how its lattice exploration ended.

/// Counters for one `combine` call (or an accumulation of many).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombineStats {
    /// Candidates popped from the frontier.
    pub popped: u64,
    /// Candidates submitted to the cell (equals `popped`; every pop is
    /// proposed, there is no top-K cap).
    pub submitted: u64,
    /// Distinct neighbors generated past the dedup set.
    pub generated: u64,
    /// Frontier entries discarded by the global stop rule.
    pub pruned_fuzz1: u64,
    /// Generated neighbors refused admission to the frontier.
    pub pruned_fuzz2: u64,
}

impl CombineStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        CombineStats::default()
    }

    /// Folds another call's counters into this one.
    pub fn merge(&mut self, other: &CombineStats) {
        self.popped += other.popped;
        self.submitted += other.submitted;
        self.generated += other.generated;
        self.pruned_fuzz1 += other.pruned_fuzz1;
        self.pruned_fuzz2 += other.pruned_fuzz2;
    }

    /// Total candidates discarded by either threshold.
    pub fn total_pruned(&self) -> u64 {
        self.pruned_fuzz1 + self.pruned_fuzz2
    }
}
