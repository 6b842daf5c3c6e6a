//! # Wire Protocol
//!
//! JSON bodies posted to the vehicle's `/api` endpoint.
//!
//! | Message | Body |
//! |---------|------|
//! | Heartbeat | `{"alive": true}` |
//! | Disconnect | `{"alive": false}` |
//! | Left pad | `{"command": {"throttle": 1200, "yaw": 1500}}` |
//! | Right pad | `{"command": {"pitch": 1500, "roll": 1700}}` |

use serde::Serialize;

use crate::control::state::AxisUpdate;

/// Default endpoint path on the vehicle
pub const DEFAULT_ENDPOINT: &str = "/api";

/// A single request body.
///
/// # Examples
///
/// ```
/// use touch_pilot::control::state::AxisUpdate;
/// use touch_pilot::transport::protocol::Message;
///
/// let message = Message::command(AxisUpdate::PitchRoll { pitch: 1500, roll: 1700 });
/// assert_eq!(
///     serde_json::to_string(&message)?,
///     r#"{"command":{"pitch":1500,"roll":1700}}"#
/// );
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Message {
    /// Connection liveness
    Alive { alive: bool },
    /// Axis values of one pad
    Command { command: AxisUpdate },
}

impl Message {
    #[must_use]
    pub fn alive(alive: bool) -> Self {
        Message::Alive { alive }
    }

    #[must_use]
    pub fn command(command: AxisUpdate) -> Self {
        Message::Command { command }
    }
}
