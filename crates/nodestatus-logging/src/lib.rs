//! Process-wide `tracing` subscriber setup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

pub use tracing::{debug, error, info, trace, warn};

/// How often file logs roll over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(r: LogRotation) -> Self {
        match r {
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for rolling log files; no file output when unset.
    pub log_dir: Option<PathBuf>,
    pub file_prefix: String,
    pub rotation: LogRotation,
    pub json_format: bool,
    /// Console output goes to stderr so stdout stays free for reports.
    pub console_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            log_dir: None,
            file_prefix: "nodestatus".into(),
            rotation: LogRotation::default(),
            json_format: false,
            console_output: true,
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn fmt_layer<W>(writer: W, json: bool, ansi: bool) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_ansi(ansi);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

/// Install the global subscriber described by `config`.
///
/// Call once at startup. The returned guard flushes the file writer on drop
/// and must be held for the life of the process when file output is on.
pub fn init_logging(config: &LogConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if config.console_output {
        layers.push(fmt_layer(std::io::stderr, config.json_format, true));
    }

    let mut guard = None;
    if let Some(dir) = &config.log_dir {
        match RollingFileAppender::builder()
            .rotation(config.rotation.into())
            .filename_prefix(&config.file_prefix)
            .filename_suffix("log")
            .build(dir)
        {
            Ok(appender) => {
                let (writer, g) = tracing_appender::non_blocking(appender);
                layers.push(fmt_layer(writer, config.json_format, false));
                guard = Some(g);
            }
            Err(e) => eprintln!("log file output disabled: {}: {}", dir.display(), e),
        }
    }

    // A second init in the same process (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init();

    guard
}
