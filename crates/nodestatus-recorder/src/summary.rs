//! Point-in-time status summaries.
//!
//! Both types are rebuilt from monitor state on every request and carry the
//! time they were built at in `updated_at`.

use nodestatus_types::{NodeDescriptor, NodeId, RangeStats, StoreDescriptor, StoreId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    pub desc: StoreDescriptor,
    pub node_id: NodeId,
    pub started_at: Timestamp,
    pub updated_at: Timestamp,
    pub range_count: i64,
    pub leader_range_count: i64,
    pub available_range_count: i64,
    pub replicated_range_count: i64,
    pub stats: RangeStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
    pub desc: NodeDescriptor,
    pub store_ids: Vec<StoreId>,
    pub started_at: Timestamp,
    pub updated_at: Timestamp,
    pub range_count: i64,
    pub leader_range_count: i64,
    pub available_range_count: i64,
    pub replicated_range_count: i64,
    pub stats: RangeStats,
}

impl NodeStatus {
    /// Roll `stores` up into a node summary. Counts and stats are pointwise
    /// wrapping sums over the stores.
    pub fn from_stores(
        desc: NodeDescriptor,
        started_at: Timestamp,
        updated_at: Timestamp,
        stores: &[StoreStatus],
    ) -> Self {
        let mut status = NodeStatus {
            desc,
            store_ids: Vec::with_capacity(stores.len()),
            started_at,
            updated_at,
            range_count: 0,
            leader_range_count: 0,
            available_range_count: 0,
            replicated_range_count: 0,
            stats: RangeStats::default(),
        };
        for store in stores {
            status.store_ids.push(store.desc.store_id);
            status.range_count = status.range_count.wrapping_add(store.range_count);
            status.leader_range_count =
                status.leader_range_count.wrapping_add(store.leader_range_count);
            status.available_range_count =
                status.available_range_count.wrapping_add(store.available_range_count);
            status.replicated_range_count =
                status.replicated_range_count.wrapping_add(store.replicated_range_count);
            status.stats += &store.stats;
        }
        status
    }
}
