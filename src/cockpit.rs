//! # Cockpit
//!
//! Both pads, the command mapper and the control state behind one
//! event-in, update-out interface. No I/O happens here.
//!
//! ## Event Handling
//!
//! | Event | Pad state | Axes | Update |
//! |-------|-----------|------|--------|
//! | Start | pressed | unchanged | none |
//! | Move (pressed) | offset stored | pad's axes mapped | indicator at finger |
//! | Move (released) | unchanged | unchanged | none |
//! | End | released | pad's axes rested | indicator at rest |

use crate::config::Config;
use crate::control::mapper::{CommandMapper, ThrottleRelease};
use crate::control::state::{AxisUpdate, ControlState, AXIS_CENTER};
use crate::input::TouchEvent;
use crate::pad::tracker::PadTracker;
use crate::pad::{Indicator, Offset, PadId, Rect};

/// Result of an event that changed state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Update {
    pub pad: PadId,
    /// Frame to draw on the pad
    pub indicator: Indicator,
    /// Pad's axes to send
    pub command: AxisUpdate,
}

/// Gesture state of the whole touch surface.
///
/// # Examples
///
/// ```
/// use touch_pilot::cockpit::Cockpit;
/// use touch_pilot::control::mapper::CommandMapper;
/// use touch_pilot::control::state::AxisUpdate;
/// use touch_pilot::input::TouchEvent;
/// use touch_pilot::pad::{PadId, Rect};
///
/// let mut cockpit = Cockpit::new(
///     Rect::new(0.0, 0.0, 300.0, 300.0),
///     Rect::new(500.0, 0.0, 300.0, 300.0),
///     CommandMapper::default(),
/// );
///
/// assert!(cockpit.handle(&TouchEvent::Start { pad: PadId::Right }).is_none());
/// let update = cockpit
///     .handle(&TouchEvent::Move { pad: PadId::Right, x: 800.0, y: 0.0 })
///     .unwrap();
/// assert_eq!(update.command, AxisUpdate::PitchRoll { pitch: 2000, roll: 2000 });
/// ```
#[derive(Debug, Clone)]
pub struct Cockpit {
    left: PadTracker,
    right: PadTracker,
    mapper: CommandMapper,
    state: ControlState,
}

impl Cockpit {
    #[must_use]
    pub fn new(left: Rect, right: Rect, mapper: CommandMapper) -> Self {
        Self {
            left: PadTracker::new(PadId::Left, left),
            right: PadTracker::new(PadId::Right, right),
            mapper,
            state: ControlState::new(),
        }
    }

    /// Builds a cockpit from the `[pads]` and `[mapping]` sections.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.pads.left,
            config.pads.right,
            CommandMapper::new(&config.mapping),
        )
    }

    #[must_use]
    pub fn state(&self) -> &ControlState {
        &self.state
    }

    #[must_use]
    pub fn pad(&self, id: PadId) -> &PadTracker {
        match id {
            PadId::Left => &self.left,
            PadId::Right => &self.right,
        }
    }

    /// Where the pad's indicator sits when no finger is on it.
    ///
    /// The right pad rests at its center. The left pad is centered
    /// horizontally; vertically it sits at:
    ///
    /// | Throttle after release | Height |
    /// |------------------------|--------|
    /// | held below center | last finger height |
    /// | capped to center | middle |
    /// | at minimum (start-up, reset) | bottom edge |
    #[must_use]
    pub fn resting_indicator(&self, id: PadId) -> Indicator {
        let bounds = self.pad(id).bounds();
        match id {
            PadId::Left => {
                let throttle = self.state.get(id.vertical_axis());
                let held = self.mapper.throttle_release() == ThrottleRelease::CapAtCenter;
                let y = match self.left.offset() {
                    Some(offset) if held && throttle < AXIS_CENTER => offset.y,
                    _ if throttle >= AXIS_CENTER => bounds.height / 2.0,
                    _ => bounds.height,
                };
                Indicator::at(Offset::new(bounds.width / 2.0, y))
            }
            PadId::Right => Indicator::at(bounds.center()),
        }
    }

    /// Applies one gesture event.
    ///
    /// # Returns
    ///
    /// `Some(update)` when the event changed the pad's axes or indicator,
    /// `None` for press starts and for moves on a released pad.
    pub fn handle(&mut self, event: &TouchEvent) -> Option<Update> {
        let id = event.pad();
        let pad = match id {
            PadId::Left => &mut self.left,
            PadId::Right => &mut self.right,
        };

        match *event {
            TouchEvent::Start { .. } => {
                pad.press_start();
                None
            }
            TouchEvent::Move { x, y, .. } => {
                let offset = pad.press_move(x, y)?;
                let bounds = *pad.bounds();
                let command = self.mapper.apply(&mut self.state, id, offset, &bounds);
                Some(Update {
                    pad: id,
                    indicator: Indicator::at(offset),
                    command,
                })
            }
            TouchEvent::End { .. } => {
                pad.press_end();
                let command = self.mapper.release(&mut self.state, id);
                Some(Update {
                    pad: id,
                    indicator: self.resting_indicator(id),
                    command,
                })
            }
        }
    }
}
