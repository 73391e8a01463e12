use nodestatus_types::{NodeId, RangeId};
use thiserror::Error;

/// A producer broke the event contract.
///
/// Violations are never returned to producers: the monitor logs them, counts
/// them, and leaves its state as it was (except for [`Violation::NestedScan`],
/// which restarts the scan).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("node already started as {existing}, ignoring start of {attempted}")]
    DuplicateNodeStart { existing: NodeId, attempted: NodeId },

    #[error("range scan already open; staging inventory restarted")]
    NestedScan,

    #[error("range {0} registered outside of a scan")]
    RegisterOutsideScan(RangeId),

    #[error("range scan ended without being begun")]
    EndWithoutScan,

    #[error("delta for unknown range {0}")]
    UnknownRange(RangeId),
}

/// Failure to hand an event to the monitor feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("event feed closed")]
    Closed,
}
