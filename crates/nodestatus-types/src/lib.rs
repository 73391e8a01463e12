//! Identities, descriptors and statistics shared by the node status crates.

#[macro_use]
pub mod strong_type;

pub mod address;
pub mod descriptor;
pub mod ids;
pub mod range_stats;
pub mod time;

pub use address::{Address, AddressType};
pub use descriptor::{NodeDescriptor, StoreCapacity, StoreDescriptor};
pub use ids::*;
pub use range_stats::RangeStats;
pub use time::{format_timestamp, Clock, ManualClock, SystemClock, Timestamp};
