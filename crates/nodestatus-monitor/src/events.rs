//! Events published by node and store subsystems.
//!
//! Each subsystem sends exactly the event for what just happened; the set is
//! closed and dispatched by [`crate::StatusMonitor::process`].

use nodestatus_types::{
    NodeDescriptor, NodeId, RangeId, RangeStats, StoreDescriptor, StoreId, Timestamp,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartNodeEvent {
    pub desc: NodeDescriptor,
    pub started_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartStoreEvent {
    pub store_id: StoreId,
    pub started_at: Timestamp,
}

/// Fresh capacity snapshot for a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatusEvent {
    pub desc: StoreDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeginScanRangesEvent {
    pub store_id: StoreId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRangeEvent {
    pub store_id: StoreId,
    pub range_id: RangeId,
    #[serde(default)]
    pub stats: RangeStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndScanRangesEvent {
    pub store_id: StoreId,
}

/// Incremental stat change against a range's last known baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRangeEvent {
    pub store_id: StoreId,
    pub range_id: RangeId,
    pub delta: RangeStats,
}

/// Latest replication gauges observed on a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationStatusEvent {
    pub store_id: StoreId,
    pub leader_range_count: i64,
    pub available_range_count: i64,
    pub replicated_range_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSuccessEvent {
    pub node_id: NodeId,
    /// Carried for tracing only; counts are not split by method.
    #[serde(default)]
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallErrorEvent {
    pub node_id: NodeId,
    #[serde(default)]
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusEvent {
    StartNode(StartNodeEvent),
    StartStore(StartStoreEvent),
    StoreStatus(StoreStatusEvent),
    BeginScanRanges(BeginScanRangesEvent),
    RegisterRange(RegisterRangeEvent),
    EndScanRanges(EndScanRangesEvent),
    UpdateRange(UpdateRangeEvent),
    ReplicationStatus(ReplicationStatusEvent),
    CallSuccess(CallSuccessEvent),
    CallError(CallErrorEvent),
}

impl StatusEvent {
    /// Short name used in logs; matches the serde tag.
    pub fn kind(&self) -> &'static str {
        match self {
            StatusEvent::StartNode(_) => "start_node",
            StatusEvent::StartStore(_) => "start_store",
            StatusEvent::StoreStatus(_) => "store_status",
            StatusEvent::BeginScanRanges(_) => "begin_scan_ranges",
            StatusEvent::RegisterRange(_) => "register_range",
            StatusEvent::EndScanRanges(_) => "end_scan_ranges",
            StatusEvent::UpdateRange(_) => "update_range",
            StatusEvent::ReplicationStatus(_) => "replication_status",
            StatusEvent::CallSuccess(_) => "call_success",
            StatusEvent::CallError(_) => "call_error",
        }
    }

    /// The store the event concerns, if it is a store-level event.
    pub fn store_id(&self) -> Option<StoreId> {
        match self {
            StatusEvent::StartStore(e) => Some(e.store_id),
            StatusEvent::StoreStatus(e) => Some(e.desc.store_id),
            StatusEvent::BeginScanRanges(e) => Some(e.store_id),
            StatusEvent::RegisterRange(e) => Some(e.store_id),
            StatusEvent::EndScanRanges(e) => Some(e.store_id),
            StatusEvent::UpdateRange(e) => Some(e.store_id),
            StatusEvent::ReplicationStatus(e) => Some(e.store_id),
            StatusEvent::StartNode(_) | StatusEvent::CallSuccess(_) | StatusEvent::CallError(_) => {
                None
            }
        }
    }
}

macro_rules! impl_from_event {
    ($($variant:ident($event:ty)),* $(,)?) => {
        $(
            impl From<$event> for StatusEvent {
                fn from(e: $event) -> Self {
                    StatusEvent::$variant(e)
                }
            }
        )*
    };
}

impl_from_event!(
    StartNode(StartNodeEvent),
    StartStore(StartStoreEvent),
    StoreStatus(StoreStatusEvent),
    BeginScanRanges(BeginScanRangesEvent),
    RegisterRange(RegisterRangeEvent),
    EndScanRanges(EndScanRangesEvent),
    UpdateRange(UpdateRangeEvent),
    ReplicationStatus(ReplicationStatusEvent),
    CallSuccess(CallSuccessEvent),
    CallError(CallErrorEvent),
);
