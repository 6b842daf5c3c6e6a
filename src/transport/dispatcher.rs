//! # Fire-and-Forget Dispatcher
//!
//! Hands messages to a [`CommandSink`] without waiting for the outcome.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::protocol::Message;
use super::sink::CommandSink;

/// Spawns one delivery task per message.
///
/// Failed deliveries are logged and dropped: no retry, no backpressure, and
/// the caller's state is never rolled back. Deliveries are independent tasks,
/// so two messages sent back to back may reach the vehicle in either order.
#[derive(Clone)]
pub struct Dispatcher {
    sink: Arc<dyn CommandSink>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new(sink: Arc<dyn CommandSink>) -> Self {
        Self { sink }
    }

    /// Sends `message` in the background.
    ///
    /// Must be called from within a tokio runtime. The returned handle may be
    /// dropped; it only exists so callers can wait for delivery in tests or
    /// at shutdown.
    pub fn dispatch(&self, message: Message) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            match sink.post(&message).await {
                Ok(()) => debug!("Delivered {:?}", message),
                Err(e) => warn!("Dropped {:?}: {}", message, e),
            }
        })
    }
}
