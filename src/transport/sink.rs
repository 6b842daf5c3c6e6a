//! Trait abstraction for message delivery to enable testing

use async_trait::async_trait;

use super::protocol::Message;
use crate::error::TransportError;

/// Delivers one message to the vehicle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// Posts a message and waits for the endpoint's answer.
    async fn post(&self, message: &Message) -> Result<(), TransportError>;
}
