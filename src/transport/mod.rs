//! # Transport Module
//!
//! Delivers pad commands and heartbeats to the vehicle over HTTP.
//!
//! This module handles:
//! - JSON message shapes for the `/api` endpoint
//! - Posting messages with `reqwest`
//! - Fire-and-forget dispatch with logged, non-fatal failures
//! - The connection heartbeat timer

pub mod dispatcher;
pub mod heartbeat;
pub mod http;
pub mod protocol;
pub mod sink;
