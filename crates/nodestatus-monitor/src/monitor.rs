//! The node status monitor.
//!
//! [`StatusMonitor`] folds node and store events into per-node and per-store
//! state. All state sits behind one mutex that each handler holds only for
//! the duration of an in-memory update. Readers take the same mutex through
//! [`StatusMonitor::with_state`] so they never observe a half-applied event.

use std::collections::BTreeMap;

use nodestatus_types::{NodeDescriptor, NodeId, StoreDescriptor, StoreId, Timestamp};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::Violation;
use crate::events::*;
use crate::inventory::RangeInventory;

/// What the monitor knows about its own node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub desc: NodeDescriptor,
    pub started_at: Timestamp,
}

/// Latest replication gauges reported for a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReplicationCounts {
    pub leader_range_count: i64,
    pub available_range_count: i64,
    pub replicated_range_count: i64,
}

/// RPC outcome counters for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallCounters {
    pub success: u64,
    pub error: u64,
}

#[derive(Debug, Clone)]
pub struct StoreRecord {
    /// Zero until a start-store event arrives.
    pub started_at: Timestamp,
    pub desc: StoreDescriptor,
    pub replication: ReplicationCounts,
    pub inventory: RangeInventory,
}

impl StoreRecord {
    fn new(store_id: StoreId) -> Self {
        Self {
            started_at: 0,
            desc: StoreDescriptor::empty(store_id),
            replication: ReplicationCounts::default(),
            inventory: RangeInventory::new(),
        }
    }
}

/// Everything the monitor has accumulated.
#[derive(Debug, Default)]
pub struct MonitorState {
    node: Option<NodeRecord>,
    stores: BTreeMap<StoreId, StoreRecord>,
    calls: BTreeMap<NodeId, CallCounters>,
    violations: u64,
}

impl MonitorState {
    pub fn node(&self) -> Option<&NodeRecord> {
        self.node.as_ref()
    }

    /// Known stores in id order.
    pub fn stores(&self) -> impl Iterator<Item = (StoreId, &StoreRecord)> + '_ {
        self.stores.iter().map(|(id, rec)| (*id, rec))
    }

    pub fn store(&self, store_id: StoreId) -> Option<&StoreRecord> {
        self.stores.get(&store_id)
    }

    /// Call counters of every node that reported a call, in id order.
    pub fn calls(&self) -> impl Iterator<Item = (NodeId, CallCounters)> + '_ {
        self.calls.iter().map(|(id, c)| (*id, *c))
    }

    pub fn violations(&self) -> u64 {
        self.violations
    }

    fn store_mut(&mut self, store_id: StoreId) -> &mut StoreRecord {
        self.stores.entry(store_id).or_insert_with(|| {
            debug!(%store_id, "creating record for store seen before its start event");
            StoreRecord::new(store_id)
        })
    }

    fn record_violation(&mut self, kind: &'static str, store_id: Option<StoreId>, v: Violation) {
        self.violations += 1;
        match store_id {
            Some(store_id) => {
                warn!(event = kind, %store_id, violation = %v, "event contract violated")
            }
            None => warn!(event = kind, violation = %v, "event contract violated"),
        }
    }
}

/// Aggregates the events of one node and its stores.
///
/// Create one per node process and share it behind an `Arc` with every
/// producer and with the recorder.
#[derive(Debug, Default)]
pub struct StatusMonitor {
    state: Mutex<MonitorState>,
}

impl StatusMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against a consistent view of the accumulated state.
    ///
    /// The monitor lock is held while `f` runs, so `f` must not call back
    /// into the monitor.
    pub fn with_state<R>(&self, f: impl FnOnce(&MonitorState) -> R) -> R {
        f(&self.state.lock())
    }

    /// Number of contract violations seen so far.
    pub fn violations(&self) -> u64 {
        self.state.lock().violations
    }

    /// Dispatch an event to its handler.
    pub fn process(&self, event: StatusEvent) {
        trace!(event = event.kind(), "processing status event");
        match event {
            StatusEvent::StartNode(e) => self.on_start_node(e),
            StatusEvent::StartStore(e) => self.on_start_store(e),
            StatusEvent::StoreStatus(e) => self.on_store_status(e),
            StatusEvent::BeginScanRanges(e) => self.on_begin_scan_ranges(e),
            StatusEvent::RegisterRange(e) => self.on_register_range(e),
            StatusEvent::EndScanRanges(e) => self.on_end_scan_ranges(e),
            StatusEvent::UpdateRange(e) => self.on_update_range(e),
            StatusEvent::ReplicationStatus(e) => self.on_replication_status(e),
            StatusEvent::CallSuccess(e) => self.on_call_success(e),
            StatusEvent::CallError(e) => self.on_call_error(e),
        }
    }

    pub fn on_start_node(&self, event: StartNodeEvent) {
        let mut state = self.state.lock();
        if let Some(existing) = &state.node {
            let v = Violation::DuplicateNodeStart {
                existing: existing.desc.node_id,
                attempted: event.desc.node_id,
            };
            state.record_violation("start_node", None, v);
            return;
        }
        debug!(node_id = %event.desc.node_id, started_at = event.started_at, "node started");
        state.node = Some(NodeRecord {
            desc: event.desc,
            started_at: event.started_at,
        });
    }

    /// Record a store's start time. The store's inventory starts idle and
    /// empty; a restart of a known store resets it.
    pub fn on_start_store(&self, event: StartStoreEvent) {
        let mut state = self.state.lock();
        let store = state.store_mut(event.store_id);
        store.started_at = event.started_at;
        store.inventory = RangeInventory::new();
        debug!(store_id = %event.store_id, started_at = event.started_at, "store started");
    }

    pub fn on_store_status(&self, event: StoreStatusEvent) {
        let mut state = self.state.lock();
        let store_id = event.desc.store_id;
        state.store_mut(store_id).desc = event.desc;
    }

    pub fn on_begin_scan_ranges(&self, event: BeginScanRangesEvent) {
        let mut state = self.state.lock();
        let restarted = state.store_mut(event.store_id).inventory.begin_scan();
        if restarted {
            state.record_violation(
                "begin_scan_ranges",
                Some(event.store_id),
                Violation::NestedScan,
            );
        }
    }

    pub fn on_register_range(&self, event: RegisterRangeEvent) {
        let mut state = self.state.lock();
        let result = state
            .store_mut(event.store_id)
            .inventory
            .register(event.range_id, event.stats);
        if let Err(v) = result {
            state.record_violation("register_range", Some(event.store_id), v);
        }
    }

    pub fn on_end_scan_ranges(&self, event: EndScanRangesEvent) {
        let mut state = self.state.lock();
        let result = state.store_mut(event.store_id).inventory.end_scan();
        match result {
            Ok(ranges) => debug!(store_id = %event.store_id, ranges, "range scan committed"),
            Err(v) => state.record_violation("end_scan_ranges", Some(event.store_id), v),
        }
    }

    pub fn on_update_range(&self, event: UpdateRangeEvent) {
        let mut state = self.state.lock();
        let result = state
            .store_mut(event.store_id)
            .inventory
            .apply_delta(event.range_id, &event.delta);
        if let Err(v) = result {
            state.record_violation("update_range", Some(event.store_id), v);
        }
    }

    pub fn on_replication_status(&self, event: ReplicationStatusEvent) {
        let mut state = self.state.lock();
        state.store_mut(event.store_id).replication = ReplicationCounts {
            leader_range_count: event.leader_range_count,
            available_range_count: event.available_range_count,
            replicated_range_count: event.replicated_range_count,
        };
    }

    pub fn on_call_success(&self, event: CallSuccessEvent) {
        trace!(node_id = %event.node_id, method = %event.method, "call succeeded");
        self.state.lock().calls.entry(event.node_id).or_default().success += 1;
    }

    pub fn on_call_error(&self, event: CallErrorEvent) {
        trace!(node_id = %event.node_id, method = %event.method, "call failed");
        self.state.lock().calls.entry(event.node_id).or_default().error += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use nodestatus_types::{Address, RangeId, RangeStats, StoreCapacity};

    use super::*;

    fn unit_stats() -> RangeStats {
        RangeStats {
            live_bytes: 1,
            key_bytes: 2,
            last_update_nanos: 1_000,
            ..Default::default()
        }
    }

    fn scan(monitor: &StatusMonitor, store: i32, ranges: &[i64]) {
        monitor.on_begin_scan_ranges(BeginScanRangesEvent { store_id: StoreId(store) });
        for r in ranges {
            monitor.on_register_range(RegisterRangeEvent {
                store_id: StoreId(store),
                range_id: RangeId(*r),
                stats: unit_stats(),
            });
        }
        monitor.on_end_scan_ranges(EndScanRangesEvent { store_id: StoreId(store) });
    }

    fn committed(monitor: &StatusMonitor, store: i32) -> Vec<i64> {
        monitor.with_state(|s| {
            s.store(StoreId(store))
                .map(|rec| rec.inventory.ranges().map(|(id, _)| id.get()).collect())
                .unwrap_or_default()
        })
    }

    #[test]
    fn test_start_node_is_set_once() {
        let monitor = StatusMonitor::new();
        let desc = NodeDescriptor::new(NodeId(1), Address::tcp("localhost", 26257));
        monitor.on_start_node(StartNodeEvent { desc: desc.clone(), started_at: 50 });
        monitor.on_start_node(StartNodeEvent {
            desc: NodeDescriptor::new(NodeId(2), Address::default()),
            started_at: 99,
        });

        monitor.with_state(|s| {
            let node = s.node().unwrap();
            assert_eq!(node.desc, desc);
            assert_eq!(node.started_at, 50);
        });
        assert_eq!(monitor.violations(), 1);
    }

    #[test]
    fn test_store_status_replaces_descriptor() {
        let monitor = StatusMonitor::new();
        monitor.on_start_store(StartStoreEvent { store_id: StoreId(1), started_at: 60 });
        for (capacity, available) in [(100, 50), (100, 20)] {
            monitor.on_store_status(StoreStatusEvent {
                desc: StoreDescriptor::new(StoreId(1), StoreCapacity { capacity, available }),
            });
        }
        monitor.with_state(|s| {
            let rec = s.store(StoreId(1)).unwrap();
            assert_eq!(rec.started_at, 60);
            assert_eq!(rec.desc.capacity, StoreCapacity { capacity: 100, available: 20 });
        });
    }

    #[test]
    fn test_events_for_unknown_store_create_it() {
        let monitor = StatusMonitor::new();
        monitor.on_replication_status(ReplicationStatusEvent {
            store_id: StoreId(9),
            leader_range_count: 3,
            available_range_count: 4,
            replicated_range_count: 5,
        });
        monitor.with_state(|s| {
            let rec = s.store(StoreId(9)).unwrap();
            assert_eq!(rec.started_at, 0);
            assert_eq!(rec.replication.replicated_range_count, 5);
        });
        assert_eq!(monitor.violations(), 0);
    }

    #[test]
    fn test_replication_status_overwrites() {
        let monitor = StatusMonitor::new();
        for leader in [5, 2] {
            monitor.on_replication_status(ReplicationStatusEvent {
                store_id: StoreId(1),
                leader_range_count: leader,
                available_range_count: leader,
                replicated_range_count: 0,
            });
        }
        let counts = monitor.with_state(|s| s.store(StoreId(1)).unwrap().replication);
        assert_eq!(counts.leader_range_count, 2);
        assert_eq!(counts.available_range_count, 2);
    }

    #[test]
    fn test_rescan_drops_stale_ranges() {
        let monitor = StatusMonitor::new();
        monitor.on_start_store(StartStoreEvent { store_id: StoreId(1), started_at: 1 });
        scan(&monitor, 1, &[1, 2, 3]);
        assert_eq!(committed(&monitor, 1), vec![1, 2, 3]);
        scan(&monitor, 1, &[3, 4]);
        assert_eq!(committed(&monitor, 1), vec![3, 4]);
    }

    #[test]
    fn test_update_range_accumulates() {
        let monitor = StatusMonitor::new();
        scan(&monitor, 1, &[1]);
        for _ in 0..4 {
            monitor.on_update_range(UpdateRangeEvent {
                store_id: StoreId(1),
                range_id: RangeId(1),
                delta: unit_stats(),
            });
        }
        let stats = monitor.with_state(|s| {
            *s.store(StoreId(1))
                .unwrap()
                .inventory
                .get(RangeId(1))
                .unwrap()
        });
        assert_eq!(stats.live_bytes, 5);
        assert_eq!(stats.key_bytes, 10);
        assert_eq!(stats.last_update_nanos, 5_000);
    }

    #[test]
    fn test_update_unknown_range_is_dropped() {
        let monitor = StatusMonitor::new();
        scan(&monitor, 1, &[1]);
        monitor.on_update_range(UpdateRangeEvent {
            store_id: StoreId(1),
            range_id: RangeId(2),
            delta: unit_stats(),
        });
        assert_eq!(committed(&monitor, 1), vec![1]);
        assert_eq!(monitor.violations(), 1);
    }

    #[test]
    fn test_nested_scan_restarts() {
        let monitor = StatusMonitor::new();
        monitor.on_begin_scan_ranges(BeginScanRangesEvent { store_id: StoreId(1) });
        monitor.on_register_range(RegisterRangeEvent {
            store_id: StoreId(1),
            range_id: RangeId(1),
            stats: unit_stats(),
        });
        scan(&monitor, 1, &[2]);
        assert_eq!(committed(&monitor, 1), vec![2]);
        assert_eq!(monitor.violations(), 1);
    }

    #[test]
    fn test_register_outside_scan_is_dropped() {
        let monitor = StatusMonitor::new();
        monitor.on_register_range(RegisterRangeEvent {
            store_id: StoreId(1),
            range_id: RangeId(1),
            stats: unit_stats(),
        });
        monitor.on_end_scan_ranges(EndScanRangesEvent { store_id: StoreId(1) });
        assert!(committed(&monitor, 1).is_empty());
        assert_eq!(monitor.violations(), 2);
    }

    #[test]
    fn test_register_outside_scan_keeps_committed_ranges() {
        let monitor = StatusMonitor::new();
        scan(&monitor, 1, &[1, 2]);
        monitor.process(
            RegisterRangeEvent {
                store_id: StoreId(1),
                range_id: RangeId(3),
                stats: unit_stats(),
            }
            .into(),
        );
        assert_eq!(committed(&monitor, 1), vec![1, 2]);
        assert_eq!(monitor.violations(), 1);
        monitor.with_state(|s| assert!(!s.store(StoreId(1)).unwrap().inventory.is_scanning()));
    }

    #[test]
    fn test_update_range_with_wall_clock_timestamps() {
        let now = 1_790_000_000_000_000_000i64;
        let stats = RangeStats {
            live_bytes: 1,
            last_update_nanos: now,
            ..Default::default()
        };
        let monitor = StatusMonitor::new();
        monitor.on_begin_scan_ranges(BeginScanRangesEvent { store_id: StoreId(1) });
        monitor.on_register_range(RegisterRangeEvent {
            store_id: StoreId(1),
            range_id: RangeId(1),
            stats,
        });
        monitor.on_end_scan_ranges(EndScanRangesEvent { store_id: StoreId(1) });
        for _ in 0..5 {
            monitor.on_update_range(UpdateRangeEvent {
                store_id: StoreId(1),
                range_id: RangeId(1),
                delta: stats,
            });
        }
        let got = monitor.with_state(|s| {
            *s.store(StoreId(1))
                .unwrap()
                .inventory
                .get(RangeId(1))
                .unwrap()
        });
        assert_eq!(got.live_bytes, 6);
        assert_eq!(got.last_update_nanos, (0..6).fold(0i64, |acc, _| acc.wrapping_add(now)));
        assert_eq!(monitor.violations(), 0);
    }

    #[test]
    fn test_calls_ignore_method() {
        let monitor = StatusMonitor::new();
        for method in ["Get", "Put", "Get"] {
            monitor.process(CallSuccessEvent { node_id: NodeId(1), method: method.into() }.into());
        }
        monitor.process(CallErrorEvent { node_id: NodeId(1), method: "Scan".into() }.into());
        let calls: Vec<_> = monitor.with_state(|s| s.calls().collect());
        assert_eq!(calls, vec![(NodeId(1), CallCounters { success: 3, error: 1 })]);
    }

    #[test]
    fn test_start_store_resets_inventory() {
        let monitor = StatusMonitor::new();
        scan(&monitor, 1, &[1, 2]);
        monitor.on_start_store(StartStoreEvent { store_id: StoreId(1), started_at: 77 });
        assert!(committed(&monitor, 1).is_empty());
    }

    #[test]
    fn test_concurrent_producers() {
        let monitor = Arc::new(StatusMonitor::new());
        for store in 1..=4 {
            scan(&monitor, store, &[1, 2]);
        }

        let handles: Vec<_> = (1..=4)
            .map(|store| {
                let monitor = monitor.clone();
                thread::spawn(move || {
                    for i in 0..250 {
                        monitor.on_update_range(UpdateRangeEvent {
                            store_id: StoreId(store),
                            range_id: RangeId(1 + (i % 2)),
                            delta: unit_stats(),
                        });
                        monitor.on_call_success(CallSuccessEvent {
                            node_id: NodeId(1),
                            method: String::new(),
                        });
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        monitor.with_state(|s| {
            for (_, rec) in s.stores() {
                assert_eq!(rec.inventory.aggregate().live_bytes, 252);
            }
            assert_eq!(s.calls().next().unwrap().1.success, 1000);
        });
        assert_eq!(monitor.violations(), 0);
    }
}
