//! # Control State
//!
//! The four RC axes and the per-pad command snapshot sent over the wire.

use serde::Serialize;

use crate::pad::PadId;

/// Lowest pulse width an axis can take (microseconds, RC convention)
pub const AXIS_MIN: u16 = 1000;
/// Highest pulse width an axis can take
pub const AXIS_MAX: u16 = 2000;
/// Stick centered
pub const AXIS_CENTER: u16 = 1500;

/// One of the four control dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Throttle,
    Yaw,
    Pitch,
    Roll,
}

impl Axis {
    /// Value the axis holds before any input.
    ///
    /// Throttle starts at minimum, every other axis at center.
    #[must_use]
    pub fn initial(self) -> u16 {
        match self {
            Axis::Throttle => AXIS_MIN,
            Axis::Yaw | Axis::Pitch | Axis::Roll => AXIS_CENTER,
        }
    }
}

/// Clamps a raw axis value into `[AXIS_MIN, AXIS_MAX]`.
#[inline]
#[must_use]
pub fn clamp_axis(value: i64) -> u16 {
    value.clamp(AXIS_MIN as i64, AXIS_MAX as i64) as u16
}

/// Current value of every axis.
///
/// Values can only be written through [`ControlState::set`], which clamps,
/// so every axis stays within `[AXIS_MIN, AXIS_MAX]`.
///
/// # Examples
///
/// ```
/// use touch_pilot::control::state::{Axis, ControlState};
///
/// let mut state = ControlState::new();
/// assert_eq!(state.get(Axis::Throttle), 1000);
/// assert_eq!(state.get(Axis::Yaw), 1500);
///
/// state.set(Axis::Yaw, 2500);
/// assert_eq!(state.get(Axis::Yaw), 2000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    throttle: u16,
    yaw: u16,
    pitch: u16,
    roll: u16,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            throttle: Axis::Throttle.initial(),
            yaw: Axis::Yaw.initial(),
            pitch: Axis::Pitch.initial(),
            roll: Axis::Roll.initial(),
        }
    }
}

impl ControlState {
    /// Creates a state with throttle at minimum and the other axes centered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current value of an axis.
    #[must_use]
    pub fn get(&self, axis: Axis) -> u16 {
        match axis {
            Axis::Throttle => self.throttle,
            Axis::Yaw => self.yaw,
            Axis::Pitch => self.pitch,
            Axis::Roll => self.roll,
        }
    }

    /// Sets an axis, clamping into the valid pulse range.
    pub fn set(&mut self, axis: Axis, value: u16) {
        let value = clamp_axis(value as i64);
        match axis {
            Axis::Throttle => self.throttle = value,
            Axis::Yaw => self.yaw = value,
            Axis::Pitch => self.pitch = value,
            Axis::Roll => self.roll = value,
        }
    }

    /// The two axes owned by `pad`, as sent after an event on that pad.
    #[must_use]
    pub fn snapshot(&self, pad: PadId) -> AxisUpdate {
        match pad {
            PadId::Left => AxisUpdate::ThrottleYaw {
                throttle: self.throttle,
                yaw: self.yaw,
            },
            PadId::Right => AxisUpdate::PitchRoll {
                pitch: self.pitch,
                roll: self.roll,
            },
        }
    }
}

/// Partial command covering the two axes of one pad.
///
/// Serializes as a flat object, e.g. `{"throttle":1200,"yaw":1500}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AxisUpdate {
    /// Left pad
    ThrottleYaw { throttle: u16, yaw: u16 },
    /// Right pad
    PitchRoll { pitch: u16, roll: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = ControlState::default();
        assert_eq!(state.get(Axis::Throttle), AXIS_MIN);
        assert_eq!(state.get(Axis::Yaw), AXIS_CENTER);
        assert_eq!(state.get(Axis::Pitch), AXIS_CENTER);
        assert_eq!(state.get(Axis::Roll), AXIS_CENTER);
    }

    #[test]
    fn test_set_clamps_high() {
        let mut state = ControlState::new();
        state.set(Axis::Pitch, 4000);
        assert_eq!(state.get(Axis::Pitch), AXIS_MAX);
    }

    #[test]
    fn test_set_clamps_low() {
        let mut state = ControlState::new();
        state.set(Axis::Roll, 0);
        assert_eq!(state.get(Axis::Roll), AXIS_MIN);
    }

    #[test]
    fn test_set_only_touches_one_axis() {
        let mut state = ControlState::new();
        state.set(Axis::Yaw, 1800);
        assert_eq!(state.get(Axis::Yaw), 1800);
        assert_eq!(state.get(Axis::Throttle), AXIS_MIN);
        assert_eq!(state.get(Axis::Pitch), AXIS_CENTER);
        assert_eq!(state.get(Axis::Roll), AXIS_CENTER);
    }

    #[test]
    fn test_clamp_axis() {
        assert_eq!(clamp_axis(-5), AXIS_MIN);
        assert_eq!(clamp_axis(1234), 1234);
        assert_eq!(clamp_axis(99_999), AXIS_MAX);
    }

    #[test]
    fn test_snapshot_left() {
        let mut state = ControlState::new();
        state.set(Axis::Throttle, 1300);
        state.set(Axis::Pitch, 1900);
        assert_eq!(
            state.snapshot(PadId::Left),
            AxisUpdate::ThrottleYaw { throttle: 1300, yaw: 1500 }
        );
    }

    #[test]
    fn test_snapshot_right() {
        let mut state = ControlState::new();
        state.set(Axis::Roll, 1100);
        assert_eq!(
            state.snapshot(PadId::Right),
            AxisUpdate::PitchRoll { pitch: 1500, roll: 1100 }
        );
    }

    #[test]
    fn test_axis_update_serializes_flat() {
        let update = AxisUpdate::ThrottleYaw { throttle: 1000, yaw: 1500 };
        let json = serde_json::to_value(update).unwrap();
        assert_eq!(json, serde_json::json!({"throttle": 1000, "yaw": 1500}));
    }
}
