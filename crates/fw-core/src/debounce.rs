//! State debouncer: suppresses single-frame label flicker.
//!
//! Sits between the observation source and the timeline. Nothing here
//! mutates the timeline; the debouncer only decides whether a transition
//! should be instructed.

use chrono::{DateTime, Utc};

use crate::config::TrackerConfig;
use crate::label::Label;
use crate::types::Confidence;

/// Streak-counting debouncer for classified observations.
#[derive(Debug, Clone)]
pub struct Debouncer {
    min_sustain: u32,
    confidence_threshold: f32,
    confirmed: Option<Label>,
    candidate: Option<Label>,
    streak: u32,
}

impl Debouncer {
    #[must_use]
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            min_sustain: config.min_sustain_samples.max(1),
            confidence_threshold: config.confidence_threshold,
            confirmed: None,
            candidate: None,
            streak: 0,
        }
    }

    /// Feeds one observation; returns the newly confirmed label when a
    /// transition should be instructed, `None` otherwise.
    ///
    /// Low-confidence observations are inconclusive: they are ignored and
    /// the previously confirmed label persists. The first conclusive
    /// observation of a session is accepted immediately so the opening
    /// interval is never delayed by the sustain window.
    pub fn observe(
        &mut self,
        at: DateTime<Utc>,
        label: Label,
        confidence: Confidence,
    ) -> Option<Label> {
        if confidence.value() < self.confidence_threshold {
            tracing::trace!(at = %at, label = %label, confidence = %confidence, "inconclusive observation ignored");
            return None;
        }

        let Some(confirmed) = self.confirmed else {
            self.confirmed = Some(label);
            return Some(label);
        };

        if label == confirmed {
            // Flicker ended before it was sustained; forget the candidate.
            self.candidate = None;
            self.streak = 0;
            return None;
        }

        if self.candidate == Some(label) {
            self.streak += 1;
        } else {
            self.candidate = Some(label);
            self.streak = 1;
        }

        if self.streak >= self.min_sustain {
            self.confirmed = Some(label);
            self.candidate = None;
            self.streak = 0;
            Some(label)
        } else {
            tracing::trace!(at = %at, label = %label, streak = self.streak, "candidate not yet sustained");
            None
        }
    }

    /// The currently confirmed label, if any observation has been accepted.
    #[must_use]
    pub const fn confirmed(&self) -> Option<Label> {
        self.confirmed
    }
}
