use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use nodestatus_monitor::StatusMonitor;
use nodestatus_recorder::{RecorderConfig, StatusRecorder};
use nodestatus_types::{Clock, ManualClock, SystemClock};

mod replay;

use replay::{apply_events, build_report, export_once, read_event_file, read_events, OutputKind};

/// Replay a node's status events and print the derived time series and
/// status summaries as JSON.
#[derive(Parser, Debug)]
#[command(name = "nodestatus-replay", version, about)]
struct Args {
    /// JSON-lines event log; `-` reads stdin
    #[arg(short, long, required_unless_present = "dump_default_config")]
    events: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Which views to print
    #[arg(short, long, value_enum, default_value_t = OutputKind::All)]
    output: OutputKind,

    /// Stamp output with this fixed time (nanoseconds) instead of the system clock
    #[arg(long)]
    clock_nanos: Option<i64>,

    /// Also hand the time series to the configured exporter once; with the
    /// memory exporter the exported batch is included in the output
    #[arg(long)]
    export: bool,

    /// Dump default configuration and exit
    #[arg(long)]
    dump_default_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.dump_default_config {
        print!("{}", RecorderConfig::default().render()?);
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => RecorderConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RecorderConfig::default(),
    };
    let _log_guard = nodestatus_logging::init_logging(&config.log);

    let events = match args.events.as_deref() {
        Some("-") | None => read_events(io::stdin().lock())?,
        Some(path) => read_event_file(Path::new(path))?,
    };
    tracing::info!(events = events.len(), "replaying status events");

    let monitor = Arc::new(StatusMonitor::new());
    let applied = apply_events(monitor.clone(), events).await?;

    let clock: Arc<dyn Clock> = match args.clock_nanos {
        Some(nanos) => Arc::new(ManualClock::new(nanos)),
        None => Arc::new(SystemClock),
    };
    let recorder =
        Arc::new(StatusRecorder::new(monitor, clock).with_prefix(config.series_prefix.clone()));

    let exported = if args.export {
        export_once(recorder.clone(), &config).await?
    } else {
        None
    };

    let mut report = build_report(&recorder, args.output);
    report.exported = exported;
    if report.violations > 0 {
        tracing::warn!(
            violations = report.violations,
            applied,
            "event log broke the event contract"
        );
    }

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report)?;
    writeln!(stdout)?;
    Ok(())
}
