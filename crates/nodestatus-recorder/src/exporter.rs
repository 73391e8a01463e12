//! Destinations for recorded time series.

use std::sync::Arc;

use async_trait::async_trait;
use nodestatus_types::format_timestamp;
use parking_lot::Mutex;

use crate::config::ExporterKind;
use crate::error::ExportError;
use crate::series::TimeSeriesData;

/// Forwards a batch of series to a metrics backend.
#[async_trait]
pub trait Exporter: Send + Sync {
    async fn export(&self, series: &[TimeSeriesData]) -> Result<(), ExportError>;
}

/// Writes every datapoint to the log.
pub struct LogExporter;

#[async_trait]
impl Exporter for LogExporter {
    async fn export(&self, series: &[TimeSeriesData]) -> Result<(), ExportError> {
        for ts in series {
            for point in &ts.datapoints {
                tracing::info!(
                    name = %ts.name,
                    value = point.value,
                    timestamp = %format_timestamp(point.timestamp_nanos),
                    "time series datapoint"
                );
            }
        }
        Ok(())
    }
}

/// Keeps every exported batch in memory.
#[derive(Default)]
pub struct InMemoryExporter {
    batches: Mutex<Vec<Vec<TimeSeriesData>>>,
}

impl InMemoryExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().len()
    }

    /// Most recently exported batch, if any.
    pub fn last_batch(&self) -> Option<Vec<TimeSeriesData>> {
        self.batches.lock().last().cloned()
    }

    pub fn take_batches(&self) -> Vec<Vec<TimeSeriesData>> {
        std::mem::take(&mut *self.batches.lock())
    }
}

#[async_trait]
impl Exporter for InMemoryExporter {
    async fn export(&self, series: &[TimeSeriesData]) -> Result<(), ExportError> {
        self.batches.lock().push(series.to_vec());
        Ok(())
    }
}

/// Build an exporter for `kind`. Batches sent to the in-memory sink built here
/// cannot be read back; callers that need them hold an [`InMemoryExporter`].
pub fn build_exporter(kind: ExporterKind) -> Arc<dyn Exporter> {
    match kind {
        ExporterKind::Log => Arc::new(LogExporter),
        ExporterKind::Memory => Arc::new(InMemoryExporter::new()),
    }
}
