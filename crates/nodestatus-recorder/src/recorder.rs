//! Projection of monitor state into time series and status summaries.
//!
//! [`StatusRecorder`] holds no state of its own. Each call reads the clock
//! once, takes the monitor lock once, and rebuilds its output from scratch,
//! so every value in one result carries the same timestamp and reflects the
//! same set of applied events.

use std::collections::BTreeMap;
use std::sync::Arc;

use nodestatus_monitor::{CallCounters, MonitorState, StatusMonitor, StoreRecord};
use nodestatus_types::{Clock, NodeDescriptor, NodeId, StoreId, Timestamp};

use crate::series::{node_series_name, store_series_name, TimeSeriesData};
use crate::summary::{NodeStatus, StoreStatus};

pub struct StatusRecorder {
    monitor: Arc<StatusMonitor>,
    clock: Arc<dyn Clock>,
    prefix: String,
}

impl StatusRecorder {
    pub fn new(monitor: Arc<StatusMonitor>, clock: Arc<dyn Clock>) -> Self {
        Self {
            monitor,
            clock,
            prefix: String::new(),
        }
    }

    /// Prepend `prefix` to every series name.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn monitor(&self) -> &Arc<StatusMonitor> {
        &self.monitor
    }

    /// Current value of every store and node series. Order is unspecified;
    /// use [`crate::sort_series`] when a stable order matters.
    pub fn produce_time_series(&self) -> Vec<TimeSeriesData> {
        let now = self.clock.now_nanos();
        self.monitor.with_state(|state| {
            let mut out = Vec::new();
            for (store_id, store) in state.stores() {
                self.store_series(&mut out, now, store_id, store);
            }
            for (node_id, calls) in node_calls(state) {
                out.push(self.node_sample(node_id, "calls.success", now, calls.success as f64));
                out.push(self.node_sample(node_id, "calls.error", now, calls.error as f64));
            }
            out
        })
    }

    /// A summary of the node and of each of its stores, stores ordered by id.
    pub fn produce_summaries(&self) -> (NodeStatus, Vec<StoreStatus>) {
        let now = self.clock.now_nanos();
        self.monitor.with_state(|state| {
            let (desc, started_at) = match state.node() {
                Some(node) => (node.desc.clone(), node.started_at),
                None => (NodeDescriptor::default(), 0),
            };
            let stores: Vec<StoreStatus> = state
                .stores()
                .map(|(_, store)| store_status(desc.node_id, now, store))
                .collect();
            let node = NodeStatus::from_stores(desc, started_at, now, &stores);
            (node, stores)
        })
    }

    fn store_series(
        &self,
        out: &mut Vec<TimeSeriesData>,
        now: Timestamp,
        store_id: StoreId,
        store: &StoreRecord,
    ) {
        let stats = store.inventory.aggregate();
        for (field, value) in stats.named_values() {
            let name = store_series_name(&self.prefix, &field.to_lowercase(), store_id);
            out.push(TimeSeriesData::single(name, now, value as f64));
        }

        let repl = &store.replication;
        let capacity = &store.desc.capacity;
        let gauges = [
            ("ranges", store.inventory.len() as i64),
            ("ranges.leader", repl.leader_range_count),
            ("ranges.available", repl.available_range_count),
            ("ranges.replicated", repl.replicated_range_count),
            ("capacity", capacity.capacity),
            ("capacity.available", capacity.available),
        ];
        for (field, value) in gauges {
            let name = store_series_name(&self.prefix, field, store_id);
            out.push(TimeSeriesData::single(name, now, value as f64));
        }
    }

    fn node_sample(
        &self,
        node_id: NodeId,
        field: &str,
        now: Timestamp,
        value: f64,
    ) -> TimeSeriesData {
        TimeSeriesData::single(node_series_name(&self.prefix, field, node_id), now, value)
    }
}

/// Call counters for the started node (zero if it has seen no calls) and for
/// any other node that reported calls.
fn node_calls(state: &MonitorState) -> BTreeMap<NodeId, CallCounters> {
    let mut calls: BTreeMap<NodeId, CallCounters> = state.calls().collect();
    if let Some(node) = state.node() {
        calls.entry(node.desc.node_id).or_default();
    }
    calls
}

fn store_status(node_id: NodeId, now: Timestamp, store: &StoreRecord) -> StoreStatus {
    StoreStatus {
        desc: store.desc.clone(),
        node_id,
        started_at: store.started_at,
        updated_at: now,
        range_count: store.inventory.len() as i64,
        leader_range_count: store.replication.leader_range_count,
        available_range_count: store.replication.available_range_count,
        replicated_range_count: store.replication.replicated_range_count,
        stats: store.inventory.aggregate(),
    }
}
