//! Core domain logic for the focus watcher.
//!
//! This crate contains the fundamental types and logic for:
//! - Debouncing: filtering single-frame label flicker before it reaches the timeline
//! - Timeline: consolidating confirmed states into contiguous intervals
//! - Analytics: reducing a timeline snapshot into per-label totals
//! - Alerting: staged notifications after sustained unfocused time

pub mod alert;
pub mod clock;
pub mod config;
pub mod debounce;
pub mod label;
pub mod stats;
pub mod timeline;
pub mod tracker;
pub mod types;

pub use alert::{AlertFiring, AlertScheduler, NoopNotifier, Notifier};
pub use clock::{Clock, SystemClock};
pub use config::TrackerConfig;
pub use debounce::Debouncer;
pub use label::{Label, UnknownLabel};
pub use stats::{AggregateStats, compute};
pub use timeline::{
    ClosedInterval, Interval, Session, SessionSnapshot, Timeline, TimelineError,
};
pub use tracker::FocusTracker;
pub use types::{Confidence, Observation, ValidationError};
