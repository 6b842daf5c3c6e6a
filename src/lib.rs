//! # Touch Pilot Library
//!
//! Fly a quadcopter from a touchscreen with two virtual sticks.
//!
//! The left pad drives throttle and yaw, the right pad drives pitch and roll.
//! Finger positions are mapped to RC values in `[1000, 2000]` and posted to
//! the vehicle as JSON over HTTP, alongside a periodic liveness heartbeat.
//!
//! ## Data Flow
//!
//! | Stage | Module |
//! |-------|--------|
//! | Touch events (evdev or replay file) | [`input`] |
//! | Pad press state and finger offsets | [`pad`] |
//! | Offset to RC value transform | [`control`] |
//! | Both pads behind one event handler | [`cockpit`] |
//! | Indicator drawing and command dispatch | [`session`], [`render`] |
//! | HTTP delivery and heartbeat | [`transport`] |

pub mod cockpit;
pub mod config;
pub mod control;
pub mod error;
pub mod input;
pub mod pad;
pub mod render;
pub mod session;
pub mod transport;
