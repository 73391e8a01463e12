//! Node status recorder.
//!
//! Reads the state accumulated by a [`nodestatus_monitor::StatusMonitor`]
//! and turns it into time-series samples and node/store status summaries,
//! stamped with an injected clock. Also provides the exporters and the
//! periodic poller that ship those samples elsewhere.

pub mod config;
pub mod error;
pub mod exporter;
pub mod poller;
pub mod recorder;
pub mod series;
pub mod summary;

pub use config::{ExporterKind, RecorderConfig};
pub use error::{ConfigError, ExportError};
pub use exporter::{build_exporter, Exporter, InMemoryExporter, LogExporter};
pub use poller::{PollerHandle, TimeSeriesPoller};
pub use recorder::StatusRecorder;
pub use series::{
    node_series_name, sort_series, store_series_name, TimeSeriesData, TimeSeriesDatapoint,
};
pub use summary::{NodeStatus, StoreStatus};
