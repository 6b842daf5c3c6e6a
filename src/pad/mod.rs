//! # Pad Module
//!
//! The two virtual sticks drawn on the touchscreen.
//!
//! | Pad | Vertical axis | Horizontal axis |
//! |-----|---------------|-----------------|
//! | Left | Throttle | Yaw |
//! | Right | Pitch | Roll |
//!
//! Coordinates are in touchscreen units with the origin at the top-left
//! corner of the screen; y grows downwards.

pub mod tracker;

use serde::{Deserialize, Serialize};

use crate::control::state::Axis;

/// Radius of the finger indicator circle, in touchscreen units.
pub const INDICATOR_RADIUS: f64 = 50.0;

/// Identifies one of the two pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadId {
    Left,
    Right,
}

impl PadId {
    /// Both pads, left first.
    pub const ALL: [PadId; 2] = [PadId::Left, PadId::Right];

    /// Axis driven by vertical finger movement.
    #[must_use]
    pub fn vertical_axis(self) -> Axis {
        match self {
            PadId::Left => Axis::Throttle,
            PadId::Right => Axis::Pitch,
        }
    }

    /// Axis driven by horizontal finger movement.
    #[must_use]
    pub fn horizontal_axis(self) -> Axis {
        match self {
            PadId::Left => Axis::Yaw,
            PadId::Right => Axis::Roll,
        }
    }
}

impl std::fmt::Display for PadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PadId::Left => f.write_str("left"),
            PadId::Right => f.write_str("right"),
        }
    }
}

/// Position relative to a pad's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box of a pad in touchscreen units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Whether an absolute position lies inside the box (edges included).
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left
            && x <= self.left + self.width
            && y >= self.top
            && y <= self.top + self.height
    }

    /// Whether the two boxes share any area.
    ///
    /// Boxes that only touch along an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.left + other.width
            && other.left < self.left + self.width
            && self.top < other.top + other.height
            && other.top < self.top + self.height
    }

    /// Center of the box as an offset from its own origin.
    #[must_use]
    pub fn center(&self) -> Offset {
        Offset::new(self.width / 2.0, self.height / 2.0)
    }

    /// Converts an absolute position into an offset clamped to the box.
    ///
    /// # Examples
    ///
    /// ```
    /// use touch_pilot::pad::{Offset, Rect};
    ///
    /// let rect = Rect::new(100.0, 50.0, 300.0, 300.0);
    /// assert_eq!(rect.clamped_offset(250.0, 200.0), Offset::new(150.0, 150.0));
    /// assert_eq!(rect.clamped_offset(0.0, 900.0), Offset::new(0.0, 300.0));
    /// ```
    #[must_use]
    pub fn clamped_offset(&self, x: f64, y: f64) -> Offset {
        Offset::new(
            (x - self.left).clamp(0.0, self.width.max(0.0)),
            (y - self.top).clamp(0.0, self.height.max(0.0)),
        )
    }
}

/// Finger indicator circle, positioned relative to its pad's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    pub center: Offset,
    pub radius: f64,
}

impl Indicator {
    #[must_use]
    pub fn at(center: Offset) -> Self {
        Self {
            center,
            radius: INDICATOR_RADIUS,
        }
    }
}
