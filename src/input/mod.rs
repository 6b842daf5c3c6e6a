//! # Input Module
//!
//! Sources of pad gestures.
//!
//! This module handles:
//! - The [`TouchEvent`] model shared by all sources
//! - Decoding Linux multitouch touchscreens via evdev
//! - Replaying recorded gestures from JSON Lines files

pub mod replay;
pub mod touchscreen;

use serde::{Deserialize, Serialize};

use crate::pad::PadId;

/// A gesture event already attributed to a pad.
///
/// Positions in [`TouchEvent::Move`] are absolute touchscreen coordinates;
/// the pad tracker turns them into offsets.
///
/// # Examples
///
/// ```
/// use touch_pilot::input::TouchEvent;
/// use touch_pilot::pad::PadId;
///
/// let event: TouchEvent = serde_json::from_str(r#"{"type":"move","pad":"left","x":10,"y":20}"#)?;
/// assert_eq!(event, TouchEvent::Move { pad: PadId::Left, x: 10.0, y: 20.0 });
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TouchEvent {
    /// Finger down
    Start { pad: PadId },
    /// Finger moved to an absolute position
    Move { pad: PadId, x: f64, y: f64 },
    /// Finger lifted
    End { pad: PadId },
}

impl TouchEvent {
    /// Pad the event belongs to.
    #[must_use]
    pub fn pad(&self) -> PadId {
        match *self {
            TouchEvent::Start { pad } | TouchEvent::Move { pad, .. } | TouchEvent::End { pad } => pad,
        }
    }
}
