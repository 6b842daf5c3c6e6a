//! # Multitouch Touchscreen Module
//!
//! Reads a Linux multitouch touchscreen through evdev and turns finger
//! contacts into per-pad [`TouchEvent`]s.
//!
//! ## Protocol
//!
//! Devices report contacts with the type-B slot protocol:
//!
//! | Event | Meaning |
//! |-------|---------|
//! | ABS_MT_SLOT | Following events refer to this slot |
//! | ABS_MT_TRACKING_ID >= 0 | New contact in the slot |
//! | ABS_MT_TRACKING_ID = -1 | Contact lifted |
//! | ABS_MT_POSITION_X/Y | Contact position |
//! | SYN_REPORT | End of frame |
//!
//! ## Pad Assignment
//!
//! A contact belongs to the pad containing its first position for its whole
//! lifetime, even if the finger slides off the pad. Contacts starting outside
//! both pads are ignored. A slot that receives a new tracking ID before its
//! lift was reported ends the old contact first.

use evdev::{AbsoluteAxisType, Device, InputEvent, InputEventKind, Synchronization};
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::TouchEvent;
use crate::error::{Result, TouchPilotError};
use crate::pad::{PadId, Rect};

/// Number of simultaneous contacts tracked
pub const MAX_SLOTS: usize = 10;

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    active: bool,
    x: i32,
    y: i32,
    pad: Option<PadId>,
    /// Pad of a reported contact replaced by a new tracking ID this frame
    replaced: Option<PadId>,
    began: bool,
    moved: bool,
    lifted: bool,
}

impl Slot {
    /// Forgets the contact. The position is kept: the kernel does not
    /// resend coordinates that did not change.
    fn clear_contact(&mut self) {
        self.active = false;
        self.pad = None;
        self.began = false;
        self.moved = false;
        self.lifted = false;
    }
}

/// Decodes multitouch evdev events into pad gestures.
///
/// Events are buffered until `SYN_REPORT`, then emitted per slot in slot
/// order.
#[derive(Debug, Clone)]
pub struct MultitouchDecoder {
    left: Rect,
    right: Rect,
    slots: [Slot; MAX_SLOTS],
    current: Option<usize>,
}

impl MultitouchDecoder {
    /// Creates a decoder for the given pad rectangles (touchscreen units).
    #[must_use]
    pub fn new(left: Rect, right: Rect) -> Self {
        Self {
            left,
            right,
            slots: [Slot::default(); MAX_SLOTS],
            current: Some(0),
        }
    }

    /// Processes one evdev event.
    ///
    /// # Returns
    ///
    /// Gestures completed by this event; empty except on `SYN_REPORT`.
    pub fn process_event(&mut self, event: &InputEvent) -> Vec<TouchEvent> {
        match event.kind() {
            InputEventKind::AbsAxis(axis) => {
                self.process_axis_event(axis, event.value());
                Vec::new()
            }
            InputEventKind::Synchronization(Synchronization::SYN_REPORT) => self.flush(),
            _ => Vec::new(),
        }
    }

    fn process_axis_event(&mut self, axis: AbsoluteAxisType, value: i32) {
        if axis == AbsoluteAxisType::ABS_MT_SLOT {
            // Out-of-range slots are dropped until the next valid ABS_MT_SLOT
            self.current = usize::try_from(value).ok().filter(|&slot| slot < MAX_SLOTS);
            return;
        }

        let Some(slot) = self.current.map(|index| &mut self.slots[index]) else {
            return;
        };

        match axis {
            AbsoluteAxisType::ABS_MT_TRACKING_ID => {
                if value >= 0 {
                    // Slot reused before the old contact's lift was reported
                    if slot.active && !slot.began && slot.replaced.is_none() {
                        slot.replaced = slot.pad;
                    }
                    slot.active = true;
                    slot.began = true;
                    slot.lifted = false;
                    slot.pad = None;
                } else {
                    slot.lifted = true;
                }
            }
            AbsoluteAxisType::ABS_MT_POSITION_X => {
                slot.x = value;
                slot.moved = true;
            }
            AbsoluteAxisType::ABS_MT_POSITION_Y => {
                slot.y = value;
                slot.moved = true;
            }
            _ => {
                // Pressure, touch major, single-touch emulation, etc.
            }
        }
    }

    fn flush(&mut self) -> Vec<TouchEvent> {
        let mut events = Vec::new();
        let (left, right) = (self.left, self.right);

        for slot in &mut self.slots {
            if let Some(pad) = slot.replaced.take() {
                events.push(TouchEvent::End { pad });
            }
            if slot.began {
                slot.pad = hit_test(&left, &right, slot.x as f64, slot.y as f64);
                if let Some(pad) = slot.pad {
                    events.push(TouchEvent::Start { pad });
                }
            } else if slot.moved && slot.active {
                if let Some(pad) = slot.pad {
                    events.push(TouchEvent::Move {
                        pad,
                        x: slot.x as f64,
                        y: slot.y as f64,
                    });
                }
            }
            slot.began = false;
            slot.moved = false;

            if slot.lifted {
                if let Some(pad) = slot.pad {
                    events.push(TouchEvent::End { pad });
                }
                slot.clear_contact();
            }
        }

        events
    }
}

fn hit_test(left: &Rect, right: &Rect, x: f64, y: f64) -> Option<PadId> {
    if left.contains(x, y) {
        Some(PadId::Left)
    } else if right.contains(x, y) {
        Some(PadId::Right)
    } else {
        None
    }
}

/// Multitouch touchscreen handle.
pub struct Touchscreen {
    device: Device,
    device_path: String,
}

impl std::fmt::Debug for Touchscreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Touchscreen")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl Touchscreen {
    /// Opens a touchscreen.
    ///
    /// With `Some(path)` that device is opened; with `None` the first
    /// `/dev/input/event*` device reporting `ABS_MT_POSITION_X` is used.
    ///
    /// # Errors
    ///
    /// - `Touchscreen`: the given device cannot be opened or is not multitouch
    /// - `TouchscreenNotFound`: auto-detection found no multitouch device
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use touch_pilot::input::touchscreen::Touchscreen;
    ///
    /// let screen = Touchscreen::open(None)?;
    /// println!("Using touchscreen at: {}", screen.device_path());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::open_path(path),
            None => Self::detect(),
        }
    }

    fn open_path(path: &str) -> Result<Self> {
        let device = Device::open(path)
            .map_err(|e| TouchPilotError::Touchscreen(format!("Failed to open {}: {}", path, e)))?;

        if !is_multitouch(&device) {
            return Err(TouchPilotError::Touchscreen(format!(
                "{} does not report multitouch positions",
                path
            )));
        }

        info!("Opened touchscreen at {}", path);
        Ok(Self {
            device,
            device_path: path.to_string(),
        })
    }

    fn detect() -> Result<Self> {
        let input_dir = Path::new("/dev/input");

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| TouchPilotError::Touchscreen(format!("Failed to read /dev/input: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| TouchPilotError::Touchscreen(format!("Failed to read directory entry: {}", e)))?;

        // Deterministic choice when several touch devices are present
        entries.sort_by_key(|entry| entry.path());

        for entry in entries {
            let path = entry.path();
            let is_event_node = path
                .file_name()
                .map_or(false, |name| name.to_string_lossy().starts_with("event"));
            if !is_event_node {
                continue;
            }

            match Device::open(&path) {
                Ok(device) if is_multitouch(&device) => {
                    let device_path = path.to_string_lossy().to_string();
                    info!(
                        "Found touchscreen {} at: {}",
                        device.name().unwrap_or("<unnamed>"),
                        device_path
                    );
                    return Ok(Self { device, device_path });
                }
                Ok(_) => debug!("Skipping {}: not multitouch", path.display()),
                Err(e) => debug!("Could not open {}: {}", path.display(), e),
            }
        }

        Err(TouchPilotError::TouchscreenNotFound)
    }

    /// Path of the opened `/dev/input/eventX` node.
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Fetches pending events; blocks until at least one is available.
    ///
    /// # Errors
    ///
    /// Returns `Touchscreen` if reading fails (e.g. device unplugged).
    pub fn fetch_events(&mut self) -> Result<impl Iterator<Item = InputEvent> + '_> {
        self.device
            .fetch_events()
            .map_err(|e| TouchPilotError::Touchscreen(format!("Failed to fetch events: {}", e)))
    }

    /// Reads the device until it fails or `tx` is closed.
    ///
    /// Blocking; run it on a dedicated thread (`spawn_blocking`).
    ///
    /// # Errors
    ///
    /// Returns the read error that ended the loop.
    pub fn pump(mut self, mut decoder: MultitouchDecoder, tx: mpsc::Sender<TouchEvent>) -> Result<()> {
        loop {
            let events: Vec<InputEvent> = self.fetch_events()?.collect();
            for event in &events {
                for touch in decoder.process_event(event) {
                    if tx.blocking_send(touch).is_err() {
                        debug!("Touch receiver closed, stopping {}", self.device_path);
                        return Ok(());
                    }
                }
            }
            if tx.is_closed() {
                warn!("Touch receiver closed while reading {}", self.device_path);
                return Ok(());
            }
        }
    }
}

fn is_multitouch(device: &Device) -> bool {
    device
        .supported_absolute_axes()
        .map_or(false, |axes| axes.contains(AbsoluteAxisType::ABS_MT_POSITION_X))
}
