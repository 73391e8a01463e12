use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::ids::{NodeId, StoreId};

/// Identity and address of a node, captured once at node start.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub node_id: NodeId,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub attrs: Vec<String>,
}

impl NodeDescriptor {
    pub fn new(node_id: NodeId, address: Address) -> Self {
        Self {
            node_id,
            address,
            attrs: Vec::new(),
        }
    }
}

/// Point-in-time disk capacity of a store, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreCapacity {
    pub capacity: i64,
    pub available: i64,
}

/// Identity plus the latest capacity snapshot of a store.
///
/// Replaced wholesale on every store-status event; never merged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreDescriptor {
    pub store_id: StoreId,
    #[serde(default)]
    pub attrs: Vec<String>,
    #[serde(default)]
    pub capacity: StoreCapacity,
}

impl StoreDescriptor {
    pub fn new(store_id: StoreId, capacity: StoreCapacity) -> Self {
        Self {
            store_id,
            attrs: Vec::new(),
            capacity,
        }
    }

    /// Descriptor for a store nothing has been reported about yet.
    pub fn empty(store_id: StoreId) -> Self {
        Self::new(store_id, StoreCapacity::default())
    }
}
