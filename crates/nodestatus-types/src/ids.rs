strong_type!(
    /// Identity of a node in the cluster.
    NodeId,
    i32
);
strong_type!(
    /// Identity of a store; unique across the cluster, owned by one node.
    StoreId,
    i32
);
strong_type!(
    /// Identity of a range (a contiguous slice of the keyspace).
    RangeId,
    i64
);
