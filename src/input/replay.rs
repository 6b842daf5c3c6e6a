//! # Gesture Replay
//!
//! Reads recorded gestures from JSON Lines files and feeds them to the
//! session with their original timing.
//!
//! ## Format
//!
//! ```text
//! # left stick up, then release
//! {"type":"start","pad":"left"}
//! {"type":"move","pad":"left","x":150,"y":40,"delay_ms":20}
//! {"type":"end","pad":"left","delay_ms":500}
//! ```
//!
//! `delay_ms` is the wait before the event and defaults to 0. Blank lines and
//! lines starting with `#` are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::TouchEvent;
use crate::error::{Result, TouchPilotError};

/// One line of a replay file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplayEntry {
    /// Wait before emitting the event
    #[serde(default)]
    pub delay_ms: u64,

    #[serde(flatten)]
    pub event: TouchEvent,
}

/// Parses replay entries from a reader.
///
/// # Errors
///
/// Returns `Replay` with the 1-based line number of the first malformed line,
/// or `Io` if reading fails.
///
/// # Examples
///
/// ```
/// use touch_pilot::input::replay::parse;
///
/// let text = "# tap\n{\"type\":\"start\",\"pad\":\"left\"}\n\n{\"type\":\"end\",\"pad\":\"left\",\"delay_ms\":10}\n";
/// let entries = parse(text.as_bytes())?;
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[1].delay_ms, 10);
/// # Ok::<(), touch_pilot::error::TouchPilotError>(())
/// ```
pub fn parse<R: BufRead>(reader: R) -> Result<Vec<ReplayEntry>> {
    let mut entries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let entry = serde_json::from_str(trimmed).map_err(|source| TouchPilotError::Replay {
            line: index + 1,
            source,
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Loads replay entries from a file.
///
/// # Errors
///
/// Returns `Io` if the file cannot be opened, or any error from [`parse`].
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<ReplayEntry>> {
    let file = File::open(path.as_ref())?;
    let entries = parse(BufReader::new(file))?;
    info!("Loaded {} replay events from {}", entries.len(), path.as_ref().display());
    Ok(entries)
}

/// Sends entries to `tx`, sleeping `delay_ms` before each.
///
/// Stops early if the receiving side is closed.
pub async fn play(entries: Vec<ReplayEntry>, tx: mpsc::Sender<TouchEvent>) {
    for entry in entries {
        if entry.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(entry.delay_ms)).await;
        }
        if tx.send(entry.event).await.is_err() {
            debug!("Replay receiver closed, stopping");
            return;
        }
    }
    debug!("Replay finished");
}
