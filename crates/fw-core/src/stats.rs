//! Analytics aggregator: reduces a timeline snapshot into per-label totals.
//!
//! `compute` is a pure function of its snapshot. Callers re-invoke it on
//! every report request (the open interval keeps growing), passing the
//! timestamp to evaluate at when they take the snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::label::Label;
use crate::timeline::SessionSnapshot;

/// Derived per-label totals for one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateStats {
    /// Total time per label, milliseconds. Labels with no intervals are absent.
    pub per_label_ms: BTreeMap<Label, i64>,

    /// Sum of all interval durations in the snapshot.
    ///
    /// Defined as that sum and nothing else, so
    /// `sum(per_label_ms.values()) == total_ms` holds by construction.
    pub total_ms: i64,

    /// `present / (total − paused)`; 0.0 when the denominator is zero.
    pub focus_ratio: f64,
}

impl AggregateStats {
    /// Time spent under `label`, zero if it never occurred.
    #[must_use]
    pub fn label_ms(&self, label: Label) -> i64 {
        self.per_label_ms.get(&label).copied().unwrap_or(0)
    }
}

/// Computes aggregate statistics over a snapshot.
#[must_use]
pub fn compute(snapshot: &SessionSnapshot) -> AggregateStats {
    let mut per_label_ms: BTreeMap<Label, i64> = BTreeMap::new();
    let mut total_ms = 0i64;

    for interval in &snapshot.intervals {
        let duration = interval.duration_ms();
        *per_label_ms.entry(interval.label).or_insert(0) += duration;
        total_ms += duration;
    }

    let present_ms = per_label_ms.get(&Label::Present).copied().unwrap_or(0);
    let paused_ms = per_label_ms.get(&Label::Paused).copied().unwrap_or(0);
    let active_ms = total_ms - paused_ms;

    #[allow(clippy::cast_precision_loss)]
    let focus_ratio = if active_ms > 0 {
        present_ms as f64 / active_ms as f64
    } else {
        0.0
    };

    AggregateStats {
        per_label_ms,
        total_ms,
        focus_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Timeline;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 3, 9, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    /// present[0,10) away[10,40) present[40,50), finalized at 50.
    fn scenario_a() -> SessionSnapshot {
        let mut timeline = Timeline::new();
        timeline.start("scenario-a", t(0)).unwrap();
        timeline.transition(Label::Present, t(0)).unwrap();
        timeline.transition(Label::Away, t(10)).unwrap();
        timeline.transition(Label::Present, t(40)).unwrap();
        timeline.finalize(t(50)).unwrap();
        timeline.snapshot(t(50)).unwrap()
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "ratio is exact for these inputs")]
    fn scenario_a_totals() {
        let stats = compute(&scenario_a());

        assert_eq!(stats.total_ms, 50_000);
        assert_eq!(stats.label_ms(Label::Present), 20_000);
        assert_eq!(stats.label_ms(Label::Away), 30_000);
        assert_eq!(stats.focus_ratio, 0.4);
    }

    #[test]
    fn sum_of_labels_equals_total() {
        let stats = compute(&scenario_a());
        let sum: i64 = stats.per_label_ms.values().sum();
        assert_eq!(sum, stats.total_ms);
    }

    #[test]
    fn sum_invariant_holds_for_live_snapshot() {
        let mut timeline = Timeline::new();
        timeline.start("live", t(0)).unwrap();
        timeline.transition(Label::Present, t(0)).unwrap();
        timeline.transition(Label::ScreenDistraction, t(7)).unwrap();

        // Open interval included, closed at the query instant.
        let snapshot = timeline.snapshot(t(13)).unwrap();
        let stats = compute(&snapshot);

        let sum: i64 = stats.per_label_ms.values().sum();
        assert_eq!(sum, stats.total_ms);
        assert_eq!(stats.total_ms, 13_000);
        assert_eq!(stats.label_ms(Label::ScreenDistraction), 6_000);
    }

    #[test]
    fn paused_time_excluded_from_focus_denominator() {
        let mut timeline = Timeline::new();
        timeline.start("paused", t(0)).unwrap();
        timeline.transition(Label::Present, t(0)).unwrap();
        timeline.transition(Label::Paused, t(30)).unwrap();
        timeline.transition(Label::Present, t(90)).unwrap();
        timeline.finalize(t(100)).unwrap();

        let stats = compute(&timeline.snapshot(t(100)).unwrap());

        assert_eq!(stats.total_ms, 100_000);
        assert_eq!(stats.label_ms(Label::Paused), 60_000);
        // 40s present out of 40s non-paused.
        assert!((stats.focus_ratio - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "zero is exact")]
    fn zero_denominator_yields_zero_ratio() {
        let mut timeline = Timeline::new();
        timeline.start("all-paused", t(0)).unwrap();
        timeline.transition(Label::Paused, t(0)).unwrap();
        timeline.finalize(t(60)).unwrap();

        let stats = compute(&timeline.snapshot(t(60)).unwrap());
        assert_eq!(stats.focus_ratio, 0.0);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "zero is exact")]
    fn empty_snapshot_is_all_zeroes() {
        let mut timeline = Timeline::new();
        timeline.start("empty", t(0)).unwrap();
        let stats = compute(&timeline.snapshot(t(0)).unwrap());

        assert_eq!(stats.total_ms, 0);
        assert!(stats.per_label_ms.is_empty());
        assert_eq!(stats.focus_ratio, 0.0);
    }

    #[test]
    fn recompute_tracks_growing_open_interval() {
        let mut timeline = Timeline::new();
        timeline.start("growing", t(0)).unwrap();
        timeline.transition(Label::Present, t(0)).unwrap();

        let early = compute(&timeline.snapshot(t(10)).unwrap());
        let late = compute(&timeline.snapshot(t(20)).unwrap());

        assert_eq!(early.total_ms, 10_000);
        assert_eq!(late.total_ms, 20_000);
    }

    #[test]
    fn stats_serde_roundtrip() {
        let stats = compute(&scenario_a());
        let json = serde_json::to_string(&stats).unwrap();
        let parsed: AggregateStats = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stats);
    }
}
