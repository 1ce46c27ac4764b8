//! Session timeline: contiguous, non-overlapping focus-state intervals.
//!
//! The timeline is the single writer of interval data. Every other
//! component reads through [`SessionSnapshot`], which synthetically closes
//! the open interval without mutating it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::label::Label;

/// Errors from timeline mutations.
///
/// All variants are recoverable: the timeline is left untouched and the
/// caller may drop the offending event and continue.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimelineError {
    /// `start` was called while a session is already open.
    #[error("session already started")]
    AlreadyStarted,

    /// A mutation was attempted with no open session.
    #[error("no open session")]
    NotStarted,

    /// The timestamp is not monotonically increasing relative to the last
    /// accepted event. Out-of-order observations are rejected, not reordered.
    #[error("timestamp {at} is earlier than the last accepted event at {last}")]
    InvalidTransition {
        last: DateTime<Utc>,
        at: DateTime<Utc>,
    },
}

/// A span of time during which one label was continuously confirmed.
///
/// `end` is `None` only for the currently open interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Interval {
    pub label: Label,
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl Interval {
    /// Duration in milliseconds, or `None` while the interval is open.
    #[must_use]
    pub fn duration_ms(&self) -> Option<i64> {
        self.end.map(|end| (end - self.start).num_milliseconds())
    }
}

/// A closed interval inside a [`SessionSnapshot`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClosedInterval {
    pub label: Label,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ClosedInterval {
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.end - self.start).num_milliseconds()
    }
}

/// A recorded focus session.
///
/// Append-only while open; immutable once `ended_at` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: String,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub intervals: Vec<Interval>,
}

impl Session {
    /// Returns an immutable point-in-time view with the open interval
    /// synthetically closed at `as_of`.
    ///
    /// `as_of` earlier than the open interval's start is clamped to it, so
    /// the synthetic interval is never negative (zero duration is allowed
    /// when queried at the open interval's own start instant).
    #[must_use]
    pub fn snapshot(&self, as_of: DateTime<Utc>) -> SessionSnapshot {
        let mut intervals = Vec::with_capacity(self.intervals.len());
        let mut effective_as_of = self.ended_at.unwrap_or(as_of);

        for interval in &self.intervals {
            match interval.end {
                Some(end) => intervals.push(ClosedInterval {
                    label: interval.label,
                    start: interval.start,
                    end,
                }),
                None => {
                    let end = as_of.max(interval.start);
                    effective_as_of = end;
                    intervals.push(ClosedInterval {
                        label: interval.label,
                        start: interval.start,
                        end,
                    });
                }
            }
        }

        SessionSnapshot {
            session_id: self.id.clone(),
            started_at: self.started_at,
            as_of: effective_as_of,
            intervals,
        }
    }
}

/// An immutable, point-in-time read of the timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    /// The instant the open interval was synthetically closed at (or the
    /// session end, if finalized).
    pub as_of: DateTime<Utc>,
    pub intervals: Vec<ClosedInterval>,
}

/// The single mutation entry point for session interval data.
#[derive(Debug, Default)]
pub struct Timeline {
    session: Option<Session>,
    last_event_at: Option<DateTime<Utc>>,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new session at `at`.
    pub fn start(&mut self, id: impl Into<String>, at: DateTime<Utc>) -> Result<(), TimelineError> {
        if self.session.is_some() {
            return Err(TimelineError::AlreadyStarted);
        }
        self.session = Some(Session {
            id: id.into(),
            started_at: at,
            ended_at: None,
            intervals: Vec::new(),
        });
        self.last_event_at = Some(at);
        tracing::debug!(at = %at, "session started");
        Ok(())
    }

    /// Closes the open interval at `at` and opens a new one labeled `to`.
    ///
    /// Idempotent when `to` equals the open interval's label: the timeline
    /// is returned unchanged, preventing zero-duration intervals from a
    /// debounced re-confirmation of the same state.
    pub fn transition(&mut self, to: Label, at: DateTime<Utc>) -> Result<(), TimelineError> {
        let session = self.open_session_mut()?;

        if let Some(open) = session.intervals.last() {
            debug_assert!(open.end.is_none(), "only the last interval may be open");
            if open.label == to {
                return Ok(());
            }
        }

        let last = self.last_event_at.ok_or(TimelineError::NotStarted)?;
        if at < last {
            return Err(TimelineError::InvalidTransition { last, at });
        }

        let session = self.open_session_mut()?;
        if let Some(open) = session.intervals.last_mut() {
            open.end = Some(at);
        }
        session.intervals.push(Interval {
            label: to,
            start: at,
            end: None,
        });
        self.last_event_at = Some(at);
        tracing::debug!(label = %to, at = %at, "state transition");
        Ok(())
    }

    /// Closes the open interval at `at` and freezes the session.
    pub fn finalize(&mut self, at: DateTime<Utc>) -> Result<&Session, TimelineError> {
        // Validate before mutating so a bad timestamp leaves the session open.
        self.open_session_mut()?;
        let last = self.last_event_at.ok_or(TimelineError::NotStarted)?;
        if at < last {
            return Err(TimelineError::InvalidTransition { last, at });
        }

        let session = self.open_session_mut()?;
        if let Some(open) = session.intervals.last_mut() {
            if open.end.is_none() {
                open.end = Some(at);
            }
        }
        session.ended_at = Some(at);
        self.last_event_at = Some(at);
        tracing::debug!(at = %at, "session finalized");
        self.session.as_ref().ok_or(TimelineError::NotStarted)
    }

    /// Immutable copy of the timeline as of `as_of`. See [`Session::snapshot`].
    pub fn snapshot(&self, as_of: DateTime<Utc>) -> Result<SessionSnapshot, TimelineError> {
        self.session
            .as_ref()
            .map(|s| s.snapshot(as_of))
            .ok_or(TimelineError::NotStarted)
    }

    /// The label of the currently open interval, if any.
    #[must_use]
    pub fn current_label(&self) -> Option<Label> {
        self.session
            .as_ref()
            .filter(|s| s.ended_at.is_none())
            .and_then(|s| s.intervals.last())
            .map(|i| i.label)
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.ended_at.is_some())
    }

    /// The session, open or finalized.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The finalized, immutable session; `None` while still open.
    #[must_use]
    pub fn finalized_session(&self) -> Option<&Session> {
        self.session.as_ref().filter(|s| s.ended_at.is_some())
    }

    fn open_session_mut(&mut self) -> Result<&mut Session, TimelineError> {
        match self.session.as_mut() {
            Some(s) if s.ended_at.is_none() => Ok(s),
            _ => Err(TimelineError::NotStarted),
        }
    }
}
