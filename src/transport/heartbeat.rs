//! # Connection Heartbeat
//!
//! Periodic `{"alive": true}` while the pilot is connected.
//!
//! ## Lifecycle
//!
//! - `connect`: starts one repeating timer; the first beat goes out one
//!   period later
//! - `disconnect`: cancels the timer and sends a single `{"alive": false}`
//! - dropping a connected [`Connection`] cancels the timer silently

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::dispatcher::Dispatcher;
use super::protocol::Message;

/// Default period between heartbeats
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_millis(1000);

/// Liveness toggle owning the heartbeat timer.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use touch_pilot::config::TransportConfig;
/// use touch_pilot::transport::dispatcher::Dispatcher;
/// use touch_pilot::transport::heartbeat::Connection;
/// use touch_pilot::transport::http::HttpSink;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let sink = HttpSink::new(&TransportConfig::default())?;
///     let mut connection = Connection::new(Dispatcher::new(Arc::new(sink)), Duration::from_secs(1));
///
///     connection.connect();
///     tokio::time::sleep(Duration::from_secs(5)).await;
///     connection.disconnect();
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Connection {
    dispatcher: Dispatcher,
    period: Duration,
    timer: Option<JoinHandle<()>>,
}

impl Connection {
    #[must_use]
    pub fn new(dispatcher: Dispatcher, period: Duration) -> Self {
        Self {
            dispatcher,
            period,
            timer: None,
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.timer.is_some()
    }

    /// Starts the heartbeat.
    ///
    /// # Returns
    ///
    /// `false` if already connected (no second timer is started) or if the
    /// period is zero.
    pub fn connect(&mut self) -> bool {
        if self.timer.is_some() {
            debug!("Already connected");
            return false;
        }
        if self.period.is_zero() {
            warn!("Heartbeat period must be greater than zero, not connecting");
            return false;
        }

        let dispatcher = self.dispatcher.clone();
        let period = self.period;
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                dispatcher.dispatch(Message::alive(true));
            }
        }));

        info!("Connected, heartbeat every {}ms", self.period.as_millis());
        true
    }

    /// Stops the heartbeat and tells the vehicle.
    ///
    /// # Returns
    ///
    /// The delivery task of the `{"alive": false}` message, or `None` if not
    /// connected (nothing is sent).
    pub fn disconnect(&mut self) -> Option<JoinHandle<()>> {
        let Some(timer) = self.timer.take() else {
            debug!("Already disconnected");
            return None;
        };

        timer.abort();
        info!("Disconnected");
        Some(self.dispatcher.dispatch(Message::alive(false)))
    }

    /// Flips between connected and disconnected.
    ///
    /// # Returns
    ///
    /// Whether the connection is up afterwards.
    pub fn toggle(&mut self) -> bool {
        if self.is_connected() {
            self.disconnect();
        } else {
            self.connect();
        }
        self.is_connected()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
