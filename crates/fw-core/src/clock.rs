//! Injectable time source.
//!
//! The tracker itself only ever receives explicit timestamps; hosts that
//! drive the scheduler from wall clock inject a `Clock` so alert-timing
//! tests stay deterministic and never sleep.

use chrono::{DateTime, Utc};

/// A source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
