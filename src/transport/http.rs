//! # HTTP Sink
//!
//! Posts messages to the vehicle's HTTP endpoint with `reqwest`.

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use std::time::Duration;
use tracing::trace;

use super::protocol::Message;
use super::sink::CommandSink;
use crate::config::TransportConfig;
use crate::error::{Result, TransportError};

/// JSON-over-HTTP message sink.
///
/// Every request is `POST <base_url><endpoint>` with
/// `content-type: application/json` and `cache-control: no-cache`.
/// The response body is ignored; a non-2xx status is an error.
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    url: String,
}

impl HttpSink {
    /// Builds a sink from the `[transport]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the HTTP client cannot be constructed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use touch_pilot::config::TransportConfig;
    /// use touch_pilot::transport::http::HttpSink;
    ///
    /// let sink = HttpSink::new(&TransportConfig::default())?;
    /// assert_eq!(sink.url(), "http://192.168.4.1:5000/api");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(TransportError::from)?;

        Ok(Self {
            client,
            url: config.url(),
        })
    }

    /// Full URL messages are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CommandSink for HttpSink {
    async fn post(&self, message: &Message) -> std::result::Result<(), TransportError> {
        let response = self
            .client
            .post(&self.url)
            .header(CACHE_CONTROL, "no-cache")
            .json(message)
            .send()
            .await?;

        let status = response.status();
        trace!("POST {} -> {}", self.url, status);
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }
        Ok(())
    }
}
