//! Implementation of the `fw track` command.
//!
//! Reads a live observation stream (JSONL, one observation per line) from
//! stdin or a file. The alert scheduler runs on its own wall-clock ticker
//! thread; it only ever takes the same lock as the observation writer, so
//! ticks never observe a half-mutated timeline.

use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use fw_core::{Clock, FocusTracker, SystemClock};
use uuid::Uuid;

use super::util;
use crate::config::Config;
use crate::notify::ConsoleNotifier;

pub fn run(input: Option<&Path>, config: &Config) -> Result<()> {
    let session_id = Uuid::new_v4().to_string();
    let tracker = Arc::new(Mutex::new(FocusTracker::new(
        &config.tracker,
        session_id.as_str(),
        Box::new(ConsoleNotifier),
    )));
    tracing::info!(session_id = %session_id, "tracking started");

    let interval_ms = u64::try_from(config.tracker.tick_interval_ms.max(1)).unwrap_or(1_000);
    let stop = Arc::new(AtomicBool::new(false));
    let ticker = {
        let tracker = Arc::clone(&tracker);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let clock = SystemClock;
            while !stop.load(Ordering::Relaxed) {
                thread::sleep(Duration::from_millis(interval_ms));
                let Ok(mut guard) = tracker.lock() else { break };
                guard.tick(clock.now());
            }
        })
    };

    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(fs::File::open(path).with_context(
            || format!("failed to open observation file: {}", path.display()),
        )?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    for (line_num, line) in reader.lines().enumerate() {
        let Ok(line) = line else { continue };
        let Some(obs) = util::parse_observation(&line, line_num) else {
            continue;
        };
        let Ok(mut guard) = tracker.lock() else { break };
        util::feed(&mut guard, &obs);
    }

    stop.store(true, Ordering::Relaxed);
    let _ = ticker.join();

    let mut guard = tracker
        .lock()
        .map_err(|_| anyhow!("tracker lock poisoned"))?;
    util::finish(&mut guard, SystemClock.now(), config)
}
