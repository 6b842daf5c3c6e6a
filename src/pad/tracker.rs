//! # Pad Tracker
//!
//! Press state and last finger offset of a single pad.

use super::{Offset, PadId, Rect};

/// Tracks one pad between press and release.
///
/// Moves are only accepted while the pad is pressed. The last offset is kept
/// after release so the indicator can stay where the finger left it.
///
/// # Examples
///
/// ```
/// use touch_pilot::pad::{Offset, PadId, Rect};
/// use touch_pilot::pad::tracker::PadTracker;
///
/// let mut pad = PadTracker::new(PadId::Left, Rect::new(0.0, 0.0, 300.0, 300.0));
/// assert_eq!(pad.press_move(10.0, 10.0), None); // not pressed yet
///
/// pad.press_start();
/// assert_eq!(pad.press_move(10.0, 20.0), Some(Offset::new(10.0, 20.0)));
/// ```
#[derive(Debug, Clone)]
pub struct PadTracker {
    id: PadId,
    bounds: Rect,
    pressed: bool,
    offset: Option<Offset>,
}

impl PadTracker {
    #[must_use]
    pub fn new(id: PadId, bounds: Rect) -> Self {
        Self {
            id,
            bounds,
            pressed: false,
            offset: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> PadId {
        self.id
    }

    #[must_use]
    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Last accepted finger offset, if the pad was ever moved.
    #[must_use]
    pub fn offset(&self) -> Option<Offset> {
        self.offset
    }

    /// Finger down on the pad.
    pub fn press_start(&mut self) {
        self.pressed = true;
    }

    /// Finger moved to absolute position `(x, y)`.
    ///
    /// # Returns
    ///
    /// The new offset clamped to the pad's box, or `None` if the pad is not
    /// pressed and the move was ignored.
    pub fn press_move(&mut self, x: f64, y: f64) -> Option<Offset> {
        if !self.pressed {
            return None;
        }
        let offset = self.bounds.clamped_offset(x, y);
        self.offset = Some(offset);
        Some(offset)
    }

    /// Finger lifted.
    ///
    /// # Returns
    ///
    /// Whether the pad was pressed before this call.
    pub fn press_end(&mut self) -> bool {
        std::mem::replace(&mut self.pressed, false)
    }
}
