//! Time-series samples and their names.

use std::cmp::Ordering;
use std::fmt::Display;

use nodestatus_types::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesDatapoint {
    pub timestamp_nanos: Timestamp,
    pub value: f64,
}

/// A named series. The recorder emits exactly one datapoint per series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesData {
    pub name: String,
    pub datapoints: Vec<TimeSeriesDatapoint>,
}

impl TimeSeriesData {
    pub fn single(name: impl Into<String>, timestamp_nanos: Timestamp, value: f64) -> Self {
        Self {
            name: name.into(),
            datapoints: vec![TimeSeriesDatapoint {
                timestamp_nanos,
                value,
            }],
        }
    }

    fn first_timestamp(&self) -> Option<Timestamp> {
        self.datapoints.first().map(|d| d.timestamp_nanos)
    }
}

/// Sort by name, then by the first datapoint's timestamp.
pub fn sort_series(series: &mut [TimeSeriesData]) {
    series.sort_by(|a, b| match a.name.cmp(&b.name) {
        Ordering::Equal => a.first_timestamp().cmp(&b.first_timestamp()),
        other => other,
    });
}

/// `<prefix>store.<field>.<store_id>`
pub fn store_series_name(prefix: &str, field: &str, store_id: impl Display) -> String {
    format!("{}store.{}.{}", prefix, field, store_id)
}

/// `<prefix>node.<field>.<node_id>`
pub fn node_series_name(prefix: &str, field: &str, node_id: impl Display) -> String {
    format!("{}node.{}.{}", prefix, field, node_id)
}
