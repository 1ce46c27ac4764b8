//! Tracker configuration.
//!
//! All tunables are supplied as one immutable value at construction so the
//! debouncer and scheduler are independently testable with arbitrary
//! thresholds, instead of reading process-wide constants.

use serde::{Deserialize, Serialize};

use crate::label::Label;

/// Configuration consumed by the tracker pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Consecutive observations a candidate label must persist before a
    /// transition is confirmed. Values below 1 are treated as 1.
    pub min_sustain_samples: u32,

    /// Observations with confidence below this are inconclusive and ignored.
    pub confidence_threshold: f32,

    /// Ordered escalation thresholds for consecutive unfocused time.
    /// Default: 20 s, 1 min, 2 min.
    pub alert_thresholds_ms: Vec<i64>,

    /// Wall-clock interval between alert scheduler ticks.
    pub tick_interval_ms: i64,

    /// Labels that accumulate toward the alert thresholds.
    pub unfocused_labels: Vec<Label>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_sustain_samples: 2,
            confidence_threshold: 0.6,
            alert_thresholds_ms: vec![20_000, 60_000, 120_000],
            tick_interval_ms: 1_000,
            unfocused_labels: vec![
                Label::Away,
                Label::GadgetSuspected,
                Label::ScreenDistraction,
            ],
        }
    }
}

impl TrackerConfig {
    /// Whether a label counts toward the unfocused streak.
    #[must_use]
    pub fn is_unfocused(&self, label: Label) -> bool {
        self.unfocused_labels.contains(&label)
    }
}
