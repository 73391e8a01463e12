//! Injected "current time" capability.
//!
//! Everything the status core stamps is a wall-clock reading in nanoseconds
//! since the Unix epoch. The core never reads the clock itself; it is handed
//! a [`Clock`] so tests can drive time by hand.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{SecondsFormat, TimeZone, Utc};

/// Nanoseconds since the Unix epoch.
pub type Timestamp = i64;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now_nanos(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_nanos(&self) -> Timestamp {
        (**self).now_nanos()
    }
}

/// Reads the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> Timestamp {
        // Saturates past the year 2262.
        Utc::now().timestamp_nanos_opt().unwrap_or(Timestamp::MAX)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicI64,
}

impl ManualClock {
    pub fn new(nanos: Timestamp) -> Self {
        Self {
            nanos: AtomicI64::new(nanos),
        }
    }

    pub fn set(&self, nanos: Timestamp) {
        self.nanos.store(nanos, Ordering::SeqCst);
    }

    pub fn advance(&self, delta: Timestamp) {
        self.nanos.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_nanos(&self) -> Timestamp {
        self.nanos.load(Ordering::SeqCst)
    }
}

/// Render a timestamp as RFC 3339 with nanosecond precision.
pub fn format_timestamp(nanos: Timestamp) -> String {
    Utc.timestamp_nanos(nanos)
        .to_rfc3339_opts(SecondsFormat::Nanos, true)
}
