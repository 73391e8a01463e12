//! Reading event logs and building the replay report.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use nodestatus_monitor::{event_feed, StatusEvent, StatusMonitor};
use nodestatus_recorder::{
    build_exporter, sort_series, ExporterKind, InMemoryExporter, NodeStatus, RecorderConfig,
    StatusRecorder, StoreStatus, TimeSeriesData, TimeSeriesPoller,
};
use serde::Serialize;

/// Parse one JSON event per line. Blank lines and `#` comments are skipped.
pub fn read_events(reader: impl BufRead) -> anyhow::Result<Vec<StatusEvent>> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: StatusEvent = serde_json::from_str(line)
            .with_context(|| format!("invalid event on line {}", idx + 1))?;
        events.push(event);
    }
    Ok(events)
}

/// Read an event log from disk.
pub fn read_event_file(path: &Path) -> anyhow::Result<Vec<StatusEvent>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_events(BufReader::new(file)).with_context(|| format!("reading {}", path.display()))
}

/// Push `events` through an event feed into `monitor`, returning once every
/// event has been applied.
pub async fn apply_events(
    monitor: Arc<StatusMonitor>,
    events: Vec<StatusEvent>,
) -> anyhow::Result<u64> {
    let (feed, subscription) = event_feed();
    let handle = subscription.spawn(monitor);
    for event in events {
        feed.publish(event)?;
    }
    drop(feed);
    handle.await.context("event feed task failed")
}

/// Run one poll through the configured exporter.
///
/// With the in-memory exporter the exported batch is handed back so it can be
/// printed; other exporters own their output and yield `None`.
pub async fn export_once(
    recorder: Arc<StatusRecorder>,
    config: &RecorderConfig,
) -> anyhow::Result<Option<Vec<TimeSeriesData>>> {
    match config.exporter {
        ExporterKind::Memory => {
            let sink = Arc::new(InMemoryExporter::new());
            let poller = TimeSeriesPoller::new(recorder, sink.clone(), config);
            let exported = poller.poll_once().await?;
            tracing::info!(exported, "exported time series to memory");
            let mut batch = sink.last_batch().unwrap_or_default();
            sort_series(&mut batch);
            Ok(Some(batch))
        }
        kind => {
            let poller = TimeSeriesPoller::new(recorder, build_exporter(kind), config);
            let exported = poller.poll_once().await?;
            tracing::info!(exported, "exported time series");
            Ok(None)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputKind {
    Series,
    Summaries,
    All,
}

#[derive(Debug, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_series: Option<Vec<TimeSeriesData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stores: Option<Vec<StoreStatus>>,
    /// Batch handed to the in-memory exporter by `--export`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported: Option<Vec<TimeSeriesData>>,
    pub violations: u64,
}

pub fn build_report(recorder: &StatusRecorder, output: OutputKind) -> Report {
    let time_series = matches!(output, OutputKind::Series | OutputKind::All).then(|| {
        let mut series = recorder.produce_time_series();
        sort_series(&mut series);
        series
    });
    let (node, stores) = if matches!(output, OutputKind::Summaries | OutputKind::All) {
        let (node, stores) = recorder.produce_summaries();
        (Some(node), Some(stores))
    } else {
        (None, None)
    };
    Report {
        time_series,
        node,
        stores,
        exported: None,
        violations: recorder.monitor().violations(),
    }
}
