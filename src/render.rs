//! # Indicator Rendering
//!
//! Draws the finger indicator of each pad. Rendering is a side effect kept
//! out of the cockpit so the transform runs without any display.

use tracing::debug;

use crate::pad::{Indicator, PadId, Rect};

/// Single-frame indicator output.
///
/// Each call replaces the pad's previous frame: clear the pad, then draw the
/// circle. There is no animation loop; frames are drawn per event.
pub trait IndicatorRenderer {
    fn draw(&mut self, pad: PadId, bounds: &Rect, indicator: &Indicator);
}

/// Renderer that reports frames through `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRenderer;

impl IndicatorRenderer for TracingRenderer {
    fn draw(&mut self, pad: PadId, bounds: &Rect, indicator: &Indicator) {
        debug!(
            "{} pad indicator at ({:.1}, {:.1}) r={} in {}x{}",
            pad,
            indicator.center.x,
            indicator.center.y,
            indicator.radius,
            bounds.width,
            bounds.height
        );
    }
}
