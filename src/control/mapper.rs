//! # Command Mapper Module
//!
//! Converts a pad offset into RC axis values.
//!
//! ## Transform
//!
//! | Direction | Axes | Formula |
//! |-----------|------|---------|
//! | Vertical | Throttle, Pitch | `2000 - y * span / height` |
//! | Horizontal | Yaw, Roll | `1000 + x * span / width` |
//!
//! The vertical axis is inverted: top of the pad is maximum. Results are
//! rounded and clamped to 1000-2000.
//!
//! With the default span of 1000 a full finger sweep covers the full output
//! range. A span of 2000 reaches the end of the range at half the pad.
//!
//! ## Release
//!
//! Yaw, pitch and roll return to 1500. Throttle follows [`ThrottleRelease`].

use serde::Deserialize;

use super::state::{AxisUpdate, ControlState, AXIS_CENTER, AXIS_MAX, AXIS_MIN};
use crate::config::MappingConfig;
use crate::pad::{Offset, PadId, Rect};

/// Default output range covered by a full finger sweep.
pub const DEFAULT_SPAN: f64 = 1000.0;

/// What happens to throttle when the left pad is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottleRelease {
    /// Throttle above center drops to center; at or below center it is held.
    #[default]
    CapAtCenter,
    /// Throttle always drops to minimum.
    Reset,
}

impl ThrottleRelease {
    /// Throttle value after release, given the value at release time.
    ///
    /// # Examples
    ///
    /// ```
    /// use touch_pilot::control::mapper::ThrottleRelease;
    ///
    /// assert_eq!(ThrottleRelease::CapAtCenter.apply(1800), 1500);
    /// assert_eq!(ThrottleRelease::CapAtCenter.apply(1200), 1200);
    /// assert_eq!(ThrottleRelease::Reset.apply(1200), 1000);
    /// ```
    #[must_use]
    pub fn apply(self, throttle: u16) -> u16 {
        match self {
            ThrottleRelease::CapAtCenter => throttle.min(AXIS_CENTER),
            ThrottleRelease::Reset => AXIS_MIN,
        }
    }
}

/// Maps pad offsets to axis values and applies release rules.
///
/// # Examples
///
/// ```
/// use touch_pilot::control::mapper::CommandMapper;
/// use touch_pilot::control::state::{AxisUpdate, ControlState};
/// use touch_pilot::pad::{Offset, PadId, Rect};
///
/// let mapper = CommandMapper::default();
/// let mut state = ControlState::new();
/// let bounds = Rect::new(0.0, 0.0, 300.0, 300.0);
///
/// let update = mapper.apply(&mut state, PadId::Left, Offset::new(150.0, 150.0), &bounds);
/// assert_eq!(update, AxisUpdate::ThrottleYaw { throttle: 1500, yaw: 1500 });
/// ```
#[derive(Debug, Clone)]
pub struct CommandMapper {
    vertical_span: f64,
    horizontal_span: f64,
    throttle_release: ThrottleRelease,
}

impl Default for CommandMapper {
    fn default() -> Self {
        Self {
            vertical_span: DEFAULT_SPAN,
            horizontal_span: DEFAULT_SPAN,
            throttle_release: ThrottleRelease::default(),
        }
    }
}

impl CommandMapper {
    /// Creates a mapper from the `[mapping]` configuration section.
    #[must_use]
    pub fn new(config: &MappingConfig) -> Self {
        Self {
            vertical_span: config.vertical_span,
            horizontal_span: config.horizontal_span,
            throttle_release: config.throttle_release,
        }
    }

    #[must_use]
    pub fn throttle_release(&self) -> ThrottleRelease {
        self.throttle_release
    }

    /// Value of the vertical axis for a finger `y` units below the pad top.
    #[must_use]
    pub fn vertical_value(&self, y: f64, height: f64) -> u16 {
        to_axis(AXIS_MAX as f64 - y * self.vertical_span / height)
    }

    /// Value of the horizontal axis for a finger `x` units right of the pad edge.
    #[must_use]
    pub fn horizontal_value(&self, x: f64, width: f64) -> u16 {
        to_axis(AXIS_MIN as f64 + x * self.horizontal_span / width)
    }

    /// Writes the pad's two axes for a new finger offset.
    ///
    /// # Arguments
    ///
    /// * `state` - Control state to update; only the pad's own axes change
    /// * `pad` - Pad that moved
    /// * `offset` - Finger offset from the pad's origin
    /// * `bounds` - The pad's bounding box
    ///
    /// # Returns
    ///
    /// The pad's axes after the update.
    pub fn apply(
        &self,
        state: &mut ControlState,
        pad: PadId,
        offset: Offset,
        bounds: &Rect,
    ) -> AxisUpdate {
        state.set(pad.vertical_axis(), self.vertical_value(offset.y, bounds.height));
        state.set(pad.horizontal_axis(), self.horizontal_value(offset.x, bounds.width));
        state.snapshot(pad)
    }

    /// Resets the pad's two axes to their resting values.
    pub fn release(&self, state: &mut ControlState, pad: PadId) -> AxisUpdate {
        let vertical = pad.vertical_axis();
        let resting = match pad {
            PadId::Left => self.throttle_release.apply(state.get(vertical)),
            PadId::Right => AXIS_CENTER,
        };
        state.set(vertical, resting);
        state.set(pad.horizontal_axis(), AXIS_CENTER);
        state.snapshot(pad)
    }
}

/// Rounds and clamps a raw transform result.
///
/// Non-finite input (zero-sized pad) maps to center.
fn to_axis(raw: f64) -> u16 {
    if !raw.is_finite() {
        return AXIS_CENTER;
    }
    raw.round().clamp(AXIS_MIN as f64, AXIS_MAX as f64) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::state::Axis;

    fn square() -> Rect {
        Rect::new(0.0, 0.0, 300.0, 300.0)
    }

    fn mapper_with(vertical_span: f64, horizontal_span: f64, release: ThrottleRelease) -> CommandMapper {
        CommandMapper::new(&MappingConfig {
            vertical_span,
            horizontal_span,
            throttle_release: release,
        })
    }

    // ==================== Transform Tests ====================

    #[test]
    fn test_vertical_top_is_max() {
        let mapper = CommandMapper::default();
        assert_eq!(mapper.vertical_value(0.0, 300.0), AXIS_MAX);
    }

    #[test]
    fn test_vertical_bottom_is_max_minus_span() {
        let mapper = CommandMapper::default();
        assert_eq!(mapper.vertical_value(300.0, 300.0), 2000 - 1000);
    }

    #[test]
    fn test_horizontal_right_is_min_plus_span() {
        let mapper = CommandMapper::default();
        assert_eq!(mapper.horizontal_value(300.0, 300.0), 1000 + 1000);
    }

    #[test]
    fn test_horizontal_left_is_min() {
        let mapper = CommandMapper::default();
        assert_eq!(mapper.horizontal_value(0.0, 300.0), AXIS_MIN);
    }

    #[test]
    fn test_center_maps_to_center() {
        let mapper = CommandMapper::default();
        assert_eq!(mapper.vertical_value(150.0, 300.0), AXIS_CENTER);
        assert_eq!(mapper.horizontal_value(150.0, 300.0), AXIS_CENTER);
    }

    #[test]
    fn test_rounding() {
        let mapper = CommandMapper::default();
        // 1000 + 100 * 1000 / 300 = 1333.33
        assert_eq!(mapper.horizontal_value(100.0, 300.0), 1333);
        // 1000 + 200 * 1000 / 300 = 1666.67
        assert_eq!(mapper.horizontal_value(200.0, 300.0), 1667);
        // 2000 - 1 * 1000 / 400 = 1997.5, rounds away from zero
        assert_eq!(mapper.vertical_value(1.0, 400.0), 1998);
    }

    #[test]
    fn test_non_square_box_uses_matching_dimension() {
        let mapper = CommandMapper::default();
        // Width 400, height 200: x scales by width, y by height
        assert_eq!(mapper.horizontal_value(100.0, 400.0), 1250);
        assert_eq!(mapper.vertical_value(100.0, 200.0), 1500);
    }

    #[test]
    fn test_double_span_reaches_limit_at_half_pad() {
        let mapper = mapper_with(2000.0, 2000.0, ThrottleRelease::CapAtCenter);
        assert_eq!(mapper.horizontal_value(150.0, 300.0), AXIS_MAX);
        assert_eq!(mapper.horizontal_value(300.0, 300.0), AXIS_MAX);
        assert_eq!(mapper.vertical_value(150.0, 300.0), AXIS_MIN);
        assert_eq!(mapper.vertical_value(75.0, 300.0), AXIS_CENTER);
    }

    #[test]
    fn test_unclamped_offsets_are_clamped_on_output() {
        let mapper = CommandMapper::default();
        assert_eq!(mapper.vertical_value(-300.0, 300.0), AXIS_MAX);
        assert_eq!(mapper.vertical_value(900.0, 300.0), AXIS_MIN);
        assert_eq!(mapper.horizontal_value(-50.0, 300.0), AXIS_MIN);
        assert_eq!(mapper.horizontal_value(1e9, 300.0), AXIS_MAX);
    }

    #[test]
    fn test_zero_sized_box_maps_to_center() {
        let mapper = CommandMapper::default();
        // 0 * 1000 / 0 is NaN
        assert_eq!(mapper.horizontal_value(0.0, 0.0), AXIS_CENTER);
    }

    #[test]
    fn test_all_offsets_in_box_stay_in_range() {
        let mapper = mapper_with(2000.0, 1000.0, ThrottleRelease::CapAtCenter);
        let mut y = 0.0;
        while y <= 300.0 {
            let mut x = 0.0;
            while x <= 300.0 {
                let v = mapper.vertical_value(y, 300.0);
                let h = mapper.horizontal_value(x, 300.0);
                assert!((AXIS_MIN..=AXIS_MAX).contains(&v), "vertical {} at y={}", v, y);
                assert!((AXIS_MIN..=AXIS_MAX).contains(&h), "horizontal {} at x={}", h, x);
                x += 7.5;
            }
            y += 7.5;
        }
    }

    // ==================== Apply / Release Tests ====================

    #[test]
    fn test_apply_left_changes_only_throttle_and_yaw() {
        let mapper = CommandMapper::default();
        let mut state = ControlState::new();
        let update = mapper.apply(&mut state, PadId::Left, Offset::new(300.0, 0.0), &square());

        assert_eq!(update, AxisUpdate::ThrottleYaw { throttle: 2000, yaw: 2000 });
        assert_eq!(state.get(Axis::Pitch), AXIS_CENTER);
        assert_eq!(state.get(Axis::Roll), AXIS_CENTER);
    }

    #[test]
    fn test_apply_right_changes_only_pitch_and_roll() {
        let mapper = CommandMapper::default();
        let mut state = ControlState::new();
        let update = mapper.apply(&mut state, PadId::Right, Offset::new(0.0, 300.0), &square());

        assert_eq!(update, AxisUpdate::PitchRoll { pitch: 1000, roll: 1000 });
        assert_eq!(state.get(Axis::Throttle), AXIS_MIN);
        assert_eq!(state.get(Axis::Yaw), AXIS_CENTER);
    }

    #[test]
    fn test_release_right_centers_both() {
        let mapper = CommandMapper::default();
        let mut state = ControlState::new();
        mapper.apply(&mut state, PadId::Right, Offset::new(10.0, 20.0), &square());

        let update = mapper.release(&mut state, PadId::Right);
        assert_eq!(update, AxisUpdate::PitchRoll { pitch: 1500, roll: 1500 });
    }

    #[test]
    fn test_release_left_caps_high_throttle() {
        let mapper = CommandMapper::default();
        let mut state = ControlState::new();
        mapper.apply(&mut state, PadId::Left, Offset::new(30.0, 30.0), &square());
        assert_eq!(state.get(Axis::Throttle), 1900);

        let update = mapper.release(&mut state, PadId::Left);
        assert_eq!(update, AxisUpdate::ThrottleYaw { throttle: 1500, yaw: 1500 });
    }

    #[test]
    fn test_release_left_holds_low_throttle() {
        let mapper = CommandMapper::default();
        let mut state = ControlState::new();
        mapper.apply(&mut state, PadId::Left, Offset::new(270.0, 240.0), &square());
        assert_eq!(state.get(Axis::Throttle), 1200);

        let update = mapper.release(&mut state, PadId::Left);
        assert_eq!(update, AxisUpdate::ThrottleYaw { throttle: 1200, yaw: 1500 });
    }

    #[test]
    fn test_release_left_with_reset_policy() {
        let mapper = mapper_with(1000.0, 1000.0, ThrottleRelease::Reset);
        let mut state = ControlState::new();
        mapper.apply(&mut state, PadId::Left, Offset::new(150.0, 30.0), &square());

        let update = mapper.release(&mut state, PadId::Left);
        assert_eq!(update, AxisUpdate::ThrottleYaw { throttle: 1000, yaw: 1500 });
    }

    #[test]
    fn test_release_does_not_touch_other_pad() {
        let mapper = CommandMapper::default();
        let mut state = ControlState::new();
        mapper.apply(&mut state, PadId::Right, Offset::new(0.0, 0.0), &square());
        mapper.release(&mut state, PadId::Left);

        assert_eq!(state.get(Axis::Pitch), 2000);
        assert_eq!(state.get(Axis::Roll), 1000);
    }

    #[test]
    fn test_throttle_release_default_is_cap() {
        assert_eq!(ThrottleRelease::default(), ThrottleRelease::CapAtCenter);
        assert_eq!(CommandMapper::default().throttle_release(), ThrottleRelease::CapAtCenter);
    }

    #[test]
    fn test_throttle_release_cap_at_center_boundary() {
        assert_eq!(ThrottleRelease::CapAtCenter.apply(1500), 1500);
        assert_eq!(ThrottleRelease::CapAtCenter.apply(1501), 1500);
        assert_eq!(ThrottleRelease::CapAtCenter.apply(1000), 1000);
    }
}
