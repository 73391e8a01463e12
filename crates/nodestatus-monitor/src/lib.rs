//! Node status monitor.
//!
//! Collects lifecycle and operational events from a node and its stores into
//! running aggregates:
//!
//! - node descriptor and start time,
//! - per-store descriptor, start time, replication gauges and range
//!   inventory (full scans plus incremental deltas),
//! - per-node RPC success and error counts.
//!
//! The monitor only accumulates. Projections of its state into time series
//! and status summaries live in `nodestatus-recorder`.

pub mod error;
pub mod events;
pub mod feed;
pub mod inventory;
pub mod monitor;

pub use error::{FeedError, Violation};
pub use events::*;
pub use feed::{event_feed, EventFeed, FeedSubscription};
pub use inventory::RangeInventory;
pub use monitor::{
    CallCounters, MonitorState, NodeRecord, ReplicationCounts, StatusMonitor, StoreRecord,
};
