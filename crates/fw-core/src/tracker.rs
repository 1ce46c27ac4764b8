//! Tracker pipeline: debouncer → timeline → alert scheduler.
//!
//! The tracker is the single mutation entry point required by the
//! concurrency model: hosts that tick from a second thread wrap it in
//! `Arc<Mutex<_>>`, so snapshot reads happen under the same exclusion as
//! mutation and never observe a half-mutated interval.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::alert::{AlertFiring, AlertScheduler, Notifier};
use crate::config::TrackerConfig;
use crate::debounce::Debouncer;
use crate::label::Label;
use crate::stats::{AggregateStats, compute};
use crate::timeline::{Session, SessionSnapshot, Timeline, TimelineError};
use crate::types::Observation;

/// The sequential observation pipeline for one session.
///
/// The session is created lazily on the first conclusive observation, so
/// classifier warm-up time never counts toward the session.
pub struct FocusTracker {
    session_id: String,
    debouncer: Debouncer,
    timeline: Timeline,
    alerts: AlertScheduler,
    notifier: Box<dyn Notifier + Send>,
    last_observed_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for FocusTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusTracker")
            .field("session_id", &self.session_id)
            .field("timeline", &self.timeline)
            .field("last_observed_at", &self.last_observed_at)
            .finish_non_exhaustive()
    }
}

impl FocusTracker {
    #[must_use]
    pub fn new(
        config: &TrackerConfig,
        session_id: impl Into<String>,
        notifier: Box<dyn Notifier + Send>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            debouncer: Debouncer::new(config),
            timeline: Timeline::new(),
            alerts: AlertScheduler::new(config),
            notifier,
            last_observed_at: None,
        }
    }

    /// Feeds one observation through the pipeline.
    ///
    /// Returns the confirmed label when the observation completed a
    /// debounced transition, `Ok(None)` when it was absorbed. Out-of-order
    /// observations are rejected with `InvalidTransition`; the caller
    /// should drop them and continue — all invariants stay intact.
    pub fn observe(&mut self, obs: &Observation) -> Result<Option<Label>, TimelineError> {
        if self.timeline.is_finalized() {
            return Err(TimelineError::NotStarted);
        }
        if let Some(last) = self.last_observed_at {
            if obs.timestamp < last {
                return Err(TimelineError::InvalidTransition {
                    last,
                    at: obs.timestamp,
                });
            }
        }
        self.last_observed_at = Some(obs.timestamp);

        let Some(label) = self
            .debouncer
            .observe(obs.timestamp, obs.label, obs.confidence)
        else {
            return Ok(None);
        };

        if !self.timeline.is_started() {
            self.timeline.start(self.session_id.clone(), obs.timestamp)?;
        }
        self.timeline.transition(label, obs.timestamp)?;
        self.alerts.on_transition(label, obs.timestamp);
        Ok(Some(label))
    }

    /// One scheduler tick at `now`; forwards any firing to the notifier.
    ///
    /// A tick arriving after `finalize` observes the finalized state and
    /// mutates nothing.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<AlertFiring> {
        if self.timeline.is_finalized() {
            return None;
        }
        let firing = self.alerts.tick(now)?;
        self.notifier.on_alert(firing.stage, firing.label);
        Some(firing)
    }

    /// Ends the session, closing the open interval at `at`.
    pub fn finalize(&mut self, at: DateTime<Utc>) -> Result<&Session, TimelineError> {
        self.timeline.finalize(at)
    }

    /// Immutable timeline view as of `as_of`.
    pub fn snapshot(&self, as_of: DateTime<Utc>) -> Result<SessionSnapshot, TimelineError> {
        self.timeline.snapshot(as_of)
    }

    /// Recomputed aggregate statistics as of `as_of`.
    pub fn stats(&self, as_of: DateTime<Utc>) -> Result<AggregateStats, TimelineError> {
        Ok(compute(&self.snapshot(as_of)?))
    }

    /// The finalized session, once `finalize` has succeeded.
    #[must_use]
    pub fn finalized_session(&self) -> Option<&Session> {
        self.timeline.finalized_session()
    }

    /// The label of the currently open interval.
    #[must_use]
    pub fn current_label(&self) -> Option<Label> {
        self.timeline.current_label()
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.timeline.is_started()
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}
