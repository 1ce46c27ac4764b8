//! Shared helpers for the track/replay pipelines.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fw_core::{FocusTracker, Observation, compute};

use crate::config::Config;
use crate::store;

use super::report::format_duration;

/// Parses one JSONL line; `None` for blank and malformed lines.
pub(crate) fn parse_observation(line: &str, line_num: usize) -> Option<Observation> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(obs) => Some(obs),
        Err(e) => {
            tracing::debug!(
                line = line_num + 1,
                error = %e,
                "skipping malformed observation line"
            );
            None
        }
    }
}

/// Feeds one observation into the pipeline.
///
/// Rejected observations (out of order) are dropped with a warning; a
/// single bad timestamp must never end the stream. Returns whether the
/// observation was accepted.
pub(crate) fn feed(tracker: &mut FocusTracker, obs: &Observation) -> bool {
    match tracker.observe(obs) {
        Ok(Some(label)) => {
            tracing::info!(label = %label, at = %obs.timestamp, "state confirmed");
            true
        }
        Ok(None) => true,
        Err(e) => {
            tracing::warn!(error = %e, at = %obs.timestamp, "dropping observation");
            false
        }
    }
}

/// Finalizes the session at `at`, persists it, and prints a summary.
pub(crate) fn finish(tracker: &mut FocusTracker, at: DateTime<Utc>, config: &Config) -> Result<()> {
    if !tracker.is_started() {
        println!("No conclusive observations; nothing recorded.");
        return Ok(());
    }

    let session = tracker
        .finalize(at)
        .context("failed to finalize session")?
        .clone();
    let stats = compute(&session.snapshot(at));
    let path = store::save_session(&config.sessions_dir(), &session)?;

    #[allow(clippy::cast_possible_truncation)]
    let focus_pct = (stats.focus_ratio * 100.0).round() as i64;
    println!(
        "Session {} recorded: {}, focus rate {focus_pct}%",
        session.id,
        format_duration(stats.total_ms)
    );
    println!("Saved to {}", path.display());
    Ok(())
}
