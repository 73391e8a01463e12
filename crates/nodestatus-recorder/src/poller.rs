//! Periodic export of recorded time series.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::RecorderConfig;
use crate::error::ExportError;
use crate::exporter::Exporter;
use crate::recorder::StatusRecorder;

pub struct TimeSeriesPoller {
    recorder: Arc<StatusRecorder>,
    exporter: Arc<dyn Exporter>,
    interval: Duration,
    blacklist: HashSet<String>,
}

/// Handle to a running poller task.
pub struct PollerHandle {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<u64>,
}

impl TimeSeriesPoller {
    pub fn new(
        recorder: Arc<StatusRecorder>,
        exporter: Arc<dyn Exporter>,
        config: &RecorderConfig,
    ) -> Self {
        Self {
            recorder,
            exporter,
            interval: config.poll_interval(),
            blacklist: config.blacklisted_series.clone(),
        }
    }

    /// Record once and export the result, returning the number of series
    /// exported.
    pub async fn poll_once(&self) -> Result<usize, ExportError> {
        let mut series = self.recorder.produce_time_series();
        if !self.blacklist.is_empty() {
            series.retain(|s| !self.blacklist.contains(&s.name));
        }
        self.exporter.export(&series).await?;
        debug!(series = series.len(), "exported time series");
        Ok(series.len())
    }

    /// Poll every interval on a background task, starting immediately.
    pub fn start(self) -> PollerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            info!(interval_ms = self.interval.as_millis() as u64, "time series poller started");
            let mut ticker = tokio::time::interval(self.interval);
            let mut polls = 0u64;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.poll_once().await {
                            warn!(error = %e, "failed to export time series");
                        }
                        polls += 1;
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
            info!(polls, "time series poller stopped");
            polls
        });
        PollerHandle {
            shutdown_tx,
            handle,
        }
    }
}

impl PollerHandle {
    /// Stop the poller and wait for it, returning how many polls ran.
    pub async fn shutdown(self) -> u64 {
        let _ = self.shutdown_tx.send(true);
        self.handle.await.unwrap_or(0)
    }
}
