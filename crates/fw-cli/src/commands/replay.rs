//! Implementation of the `fw replay` command.
//!
//! Replays a recorded observation file through the same pipeline as
//! `fw track`, but time is simulated from the observation timestamps: the
//! scheduler receives exactly the ticks the wall clock would have
//! delivered, making replays deterministic and instant.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fw_core::{FocusTracker, Observation};
use uuid::Uuid;

use super::util;
use crate::config::Config;
use crate::notify::ConsoleNotifier;

pub fn run(input: &Path, config: &Config) -> Result<()> {
    let file = fs::File::open(input)
        .with_context(|| format!("failed to open observation file: {}", input.display()))?;
    let reader = BufReader::new(file);

    let mut observations: Vec<Observation> = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let Ok(line) = line else { continue };
        if let Some(obs) = util::parse_observation(&line, line_num) {
            observations.push(obs);
        }
    }

    if observations.is_empty() {
        println!("No observations in {}; nothing recorded.", input.display());
        return Ok(());
    }
    tracing::info!(count = observations.len(), "replaying observations");

    let session_id = Uuid::new_v4().to_string();
    let mut tracker = FocusTracker::new(
        &config.tracker,
        session_id.as_str(),
        Box::new(ConsoleNotifier),
    );

    let tick = chrono::Duration::milliseconds(config.tracker.tick_interval_ms.max(1));
    let mut next_tick: Option<DateTime<Utc>> = None;
    let mut last_accepted: Option<DateTime<Utc>> = None;

    for obs in &observations {
        // Deliver the ticks the wall clock would have produced before this
        // observation arrived.
        while let Some(due) = next_tick {
            if due > obs.timestamp {
                break;
            }
            tracker.tick(due);
            next_tick = Some(due + tick);
        }

        if util::feed(&mut tracker, obs) {
            last_accepted = Some(obs.timestamp);
        }
        if next_tick.is_none() && tracker.is_started() {
            next_tick = Some(obs.timestamp + tick);
        }
    }

    // All observations were rejected or inconclusive when last_accepted is
    // None; finish() reports that case itself.
    let at = last_accepted
        .or_else(|| observations.last().map(|o| o.timestamp))
        .context("observation list cannot be empty here")?;
    util::finish(&mut tracker, at, config)
}
