//! # Control Module
//!
//! RC axis state and the finger-to-command transform.
//!
//! This module handles:
//! - Holding throttle, yaw, pitch and roll within 1000-2000
//! - Mapping pad offsets to axis values
//! - Resting values on pad release

pub mod mapper;
pub mod state;
