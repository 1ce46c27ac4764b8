//! Alert scheduler: staged notifications after sustained unfocused time.
//!
//! Driven by wall-clock ticks, not observation arrival, so alerts fire even
//! when the next observation is seconds away. The scheduler itself performs
//! no I/O; it hands `(stage, label)` to whatever [`Notifier`] the host
//! injected.

use chrono::{DateTime, Utc};

use crate::config::TrackerConfig;
use crate::label::Label;

/// Receiver for alert side effects. Fire-and-forget: the core consumes no
/// return value.
pub trait Notifier {
    fn on_alert(&self, stage: usize, label: Label);
}

/// A notifier that discards alerts. Useful for replays and tests that only
/// care about the timeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn on_alert(&self, _stage: usize, _label: Label) {}
}

/// One fired alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertFiring {
    /// Index into the configured threshold ladder (0 = first alert).
    pub stage: usize,
    /// The unfocused label active when the alert fired.
    pub label: Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlertState {
    /// Focused or paused; nothing accumulates.
    Idle,
    /// An unfocused streak is running.
    Accumulating { since: DateTime<Utc> },
    /// All thresholds fired; suppressed until the streak resets.
    Exhausted,
}

/// Threshold-ladder scheduler over consecutive unfocused time.
#[derive(Debug, Clone)]
pub struct AlertScheduler {
    thresholds_ms: Vec<i64>,
    unfocused_labels: Vec<Label>,
    state: AlertState,
    next_threshold: usize,
    current_label: Option<Label>,
}

impl AlertScheduler {
    #[must_use]
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            thresholds_ms: config.alert_thresholds_ms.clone(),
            unfocused_labels: config.unfocused_labels.clone(),
            state: AlertState::Idle,
            next_threshold: 0,
            current_label: None,
        }
    }

    /// Reacts to a confirmed transition.
    ///
    /// Entering an unfocused label starts a streak; moving between two
    /// unfocused labels keeps it running; Present or Paused resets
    /// unconditionally, so the next streak always restarts at stage 0.
    pub fn on_transition(&mut self, label: Label, at: DateTime<Utc>) {
        self.current_label = Some(label);
        if self.unfocused_labels.contains(&label) {
            if self.state == AlertState::Idle {
                self.state = AlertState::Accumulating { since: at };
                self.next_threshold = 0;
                tracing::debug!(label = %label, at = %at, "unfocused streak started");
            }
        } else {
            if self.state != AlertState::Idle {
                tracing::debug!(label = %label, at = %at, "unfocused streak reset");
            }
            self.state = AlertState::Idle;
            self.next_threshold = 0;
        }
    }

    /// Advances the scheduler to `now`; fires at most one alert per tick.
    ///
    /// A tick that arrives after several thresholds have elapsed drains the
    /// pending stages on consecutive ticks rather than bursting.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<AlertFiring> {
        let AlertState::Accumulating { since } = self.state else {
            return None;
        };
        let threshold = *self.thresholds_ms.get(self.next_threshold)?;

        let elapsed_ms = (now - since).num_milliseconds();
        if elapsed_ms < threshold {
            return None;
        }

        let stage = self.next_threshold;
        self.next_threshold += 1;
        if self.next_threshold == self.thresholds_ms.len() {
            self.state = AlertState::Exhausted;
        }

        let label = self.current_label.unwrap_or(Label::Away);
        tracing::info!(stage, label = %label, elapsed_ms, "unfocused alert fired");
        Some(AlertFiring { stage, label })
    }

    /// Whether an unfocused streak is currently accumulating.
    #[must_use]
    pub const fn is_accumulating(&self) -> bool {
        matches!(self.state, AlertState::Accumulating { .. })
    }
}
