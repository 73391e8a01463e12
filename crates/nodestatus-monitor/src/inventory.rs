//! Per-store range inventory.
//!
//! An inventory is either idle (only the committed map exists) or scanning
//! (a staging map is being filled next to it). Readers only ever see the
//! committed map; a scan becomes visible in one step when it ends, replacing
//! the committed map wholesale.

use std::collections::BTreeMap;

use nodestatus_types::{RangeId, RangeStats};

use crate::error::Violation;

#[derive(Debug, Clone, Default)]
pub struct RangeInventory {
    committed: BTreeMap<RangeId, RangeStats>,
    staging: Option<BTreeMap<RangeId, RangeStats>>,
}

impl RangeInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scanning(&self) -> bool {
        self.staging.is_some()
    }

    /// Open an empty staging map.
    ///
    /// Returns `true` when a scan was already open; its staging map is
    /// discarded and the scan starts over.
    pub fn begin_scan(&mut self) -> bool {
        self.staging.replace(BTreeMap::new()).is_some()
    }

    /// Stage `stats` for `range`. A range registered twice in one scan keeps
    /// the later stats.
    pub fn register(&mut self, range: RangeId, stats: RangeStats) -> Result<(), Violation> {
        let staging = self
            .staging
            .as_mut()
            .ok_or(Violation::RegisterOutsideScan(range))?;
        staging.insert(range, stats);
        Ok(())
    }

    /// Commit the staging map, returning the number of ranges now committed.
    pub fn end_scan(&mut self) -> Result<usize, Violation> {
        let staging = self.staging.take().ok_or(Violation::EndWithoutScan)?;
        self.committed = staging;
        Ok(self.committed.len())
    }

    /// Add `delta` to the committed stats of `range`.
    pub fn apply_delta(&mut self, range: RangeId, delta: &RangeStats) -> Result<(), Violation> {
        let stats = self
            .committed
            .get_mut(&range)
            .ok_or(Violation::UnknownRange(range))?;
        *stats += delta;
        Ok(())
    }

    /// Number of committed ranges.
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    pub fn get(&self, range: RangeId) -> Option<&RangeStats> {
        self.committed.get(&range)
    }

    /// Committed ranges in id order.
    pub fn ranges(&self) -> impl Iterator<Item = (RangeId, &RangeStats)> + '_ {
        self.committed.iter().map(|(id, stats)| (*id, stats))
    }

    /// `Add`-fold of every committed range.
    pub fn aggregate(&self) -> RangeStats {
        self.committed.values().sum()
    }
}
