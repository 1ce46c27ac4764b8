//! Session document persistence.
//!
//! Finalized sessions are written as pretty-printed JSON, one document per
//! session, atomically (write to a .tmp file, then rename).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fw_core::Session;

/// Writes a finalized session into `sessions_dir`, returning the path.
pub fn save_session(sessions_dir: &Path, session: &Session) -> Result<PathBuf> {
    if session.ended_at.is_none() {
        bail!("refusing to persist an open session");
    }

    fs::create_dir_all(sessions_dir).with_context(|| {
        format!(
            "failed to create sessions directory: {}",
            sessions_dir.display()
        )
    })?;

    let path = sessions_dir.join(format!("{}.json", session.id));
    let tmp_path = path.with_extension("tmp");

    let content =
        serde_json::to_string_pretty(session).context("failed to serialize session")?;
    fs::write(&tmp_path, content)
        .with_context(|| format!("failed to write session file: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, &path)
        .with_context(|| format!("failed to rename session file to {}", path.display()))?;

    tracing::debug!(path = %path.display(), "session persisted");
    Ok(path)
}

/// Loads a persisted session document.
pub fn load_session(path: &Path) -> Result<Session> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read session file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid session document: {}", path.display()))
}
