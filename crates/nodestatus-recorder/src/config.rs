//! Recorder configuration, loaded from a TOML file.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use nodestatus_logging::LogConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which exporter the poller hands time series to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExporterKind {
    #[default]
    Log,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Period of the time-series poller, in milliseconds.
    pub poll_interval_ms: u64,
    /// Prepended to every series name.
    pub series_prefix: String,
    pub exporter: ExporterKind,
    /// Series dropped before export.
    pub blacklisted_series: HashSet<String>,
    pub log: LogConfig,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10_000,
            series_prefix: String::new(),
            exporter: ExporterKind::default(),
            blacklisted_series: HashSet::new(),
            log: LogConfig::default(),
        }
    }
}

impl RecorderConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: RecorderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "poll_interval_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.series_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid {
                key: "series_prefix",
                reason: format!("{:?} contains whitespace", self.series_prefix),
            });
        }
        Ok(())
    }

    pub fn render(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn is_blacklisted(&self, name: &str) -> bool {
        self.blacklisted_series.contains(name)
    }
}
