//! Report command for rendering a persisted session.
//!
//! Statistics are recomputed from the session document on every invocation;
//! nothing is cached between reports.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

use anyhow::{Result, bail};
use fw_core::{AggregateStats, Label, Session, compute};
use serde::Serialize;

use crate::store;

// ========== Duration Formatting ==========

/// Formats milliseconds as a duration string.
/// Returns "Xs" under a minute, "Xm" under an hour, "Xh Ym" beyond.
/// Negative durations are treated as 0s (defensive).
pub fn format_duration(ms: i64) -> String {
    if ms < 0 {
        return "0s".to_string();
    }
    let total_seconds = ms / 1_000;
    if total_seconds < 60 {
        return format!("{total_seconds}s");
    }

    let total_minutes = total_seconds / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{total_minutes}m")
    }
}

// ========== Progress Bar ==========

/// Generates a 10-character progress bar.
/// Values <5% of max get a single block for visibility.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn progress_bar(value: i64, max: i64) -> String {
    if max == 0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value as f64 / max as f64;
    let filled = if ratio < 0.05 && value > 0 {
        1 // Minimum 1 for visibility
    } else {
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

// ========== Report Generation ==========

/// Formats the human-readable report output.
pub fn format_report(session: &Session, stats: &AggregateStats) -> String {
    let mut output = String::new();

    writeln!(output, "FOCUS REPORT: {}", session.id).unwrap();
    writeln!(
        output,
        "Started: {}",
        session.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
    .unwrap();
    if let Some(ended) = session.ended_at {
        writeln!(output, "Ended:   {}", ended.format("%Y-%m-%d %H:%M:%S UTC")).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "STATES").unwrap();
    writeln!(output, "──────").unwrap();

    if stats.per_label_ms.is_empty() {
        writeln!(output, "(no states recorded)").unwrap();
    } else {
        let max = stats.per_label_ms.values().copied().max().unwrap_or(0);
        for (label, ms) in &stats.per_label_ms {
            let duration = format_duration(*ms);
            let bar = progress_bar(*ms, max);
            writeln!(output, "{:<20}{duration:>8}  {bar}", label.as_str()).unwrap();
        }
    }

    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(
        output,
        "Total tracked: {}",
        format_duration(stats.total_ms)
    )
    .unwrap();
    writeln!(output, "Focus rate:    {}%", focus_pct(stats)).unwrap();

    output
}

#[allow(clippy::cast_possible_truncation)]
fn focus_pct(stats: &AggregateStats) -> i64 {
    (stats.focus_ratio * 100.0).round() as i64
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub session_id: String,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub total_ms: i64,
    pub per_label_ms: BTreeMap<Label, i64>,
    pub focus_ratio: f64,
    pub interval_count: usize,
}

/// Formats report data as JSON.
pub fn format_report_json(session: &Session, stats: &AggregateStats) -> Result<String> {
    let report = JsonReport {
        session_id: session.id.clone(),
        started_at: session.started_at.to_rfc3339(),
        ended_at: session.ended_at.map(|t| t.to_rfc3339()),
        total_ms: stats.total_ms,
        per_label_ms: stats.per_label_ms.clone(),
        focus_ratio: stats.focus_ratio,
        interval_count: session.intervals.len(),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run(session_path: &Path, json: bool) -> Result<()> {
    let session = store::load_session(session_path)?;
    let Some(ended_at) = session.ended_at else {
        bail!("session {} is not finalized", session.id);
    };

    let snapshot = session.snapshot(ended_at);
    let stats = compute(&snapshot);

    if json {
        println!("{}", format_report_json(&session, &stats)?);
    } else {
        print!("{}", format_report(&session, &stats));
    }

    Ok(())
}
