// Growtel (grow-infinity.io) transactional SMS client.

use std::io;
use std::time::Duration;

pub mod models;
use reqwest::Client;
use serde_json::Value;

pub use crate::models::{SmsResponse, STATUS_ACCEPTED};

pub const DEFAULT_BASE_URL: &str = "https://api.grow-infinity.io";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct GrowtelOptions {
    pub api_key: String,
    pub sender_id: String,
    /// DLT principal entity id registered for the sender.
    pub entity_id: String,
    /// DLT template id the message body must match.
    pub template_id: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum GrowtelError {
    /// The request timed out or the connection was reset before a response arrived.
    #[error("Growtel request timed out")]
    Timeout,

    /// Growtel answered but did not accept the message.
    #[error("Growtel rejected the message (status {status:?})")]
    Rejected { status: Option<i64>, body: Value },

    #[error("Growtel returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Request to Growtel failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone)]
pub struct GrowtelService {
    options: GrowtelOptions,
    client: Client,
}

impl GrowtelService {
    pub fn new(options: GrowtelOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    /// Send a single SMS. Exactly one HTTP request is made; there are no retries.
    pub async fn send_sms(&self, recipient: &str, body: &str) -> Result<SmsResponse, GrowtelError> {
        let url = format!("{}/api/sms", self.options.base_url.trim_end_matches('/'));

        let params = [
            ("key", self.options.api_key.as_str()),
            ("to", recipient),
            ("from", self.options.sender_id.as_str()),
            ("body", body),
            ("entityid", self.options.entity_id.as_str()),
            ("templateid", self.options.template_id.as_str()),
        ];

        let response = self
            .client
            .get(url)
            .query(&params)
            .timeout(self.options.timeout)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            return Err(GrowtelError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let sms = SmsResponse::from_text(&text);
        if !sms.is_accepted() {
            return Err(GrowtelError::Rejected {
                status: sms.status(),
                body: sms.body,
            });
        }

        Ok(sms)
    }
}

fn classify_transport_error(err: reqwest::Error) -> GrowtelError {
    if err.is_timeout() || is_connection_reset(&err) {
        GrowtelError::Timeout
    } else {
        GrowtelError::Transport(err.to_string())
    }
}

fn is_connection_reset(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if let Some(io_err) = inner.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted
            ) {
                return true;
            }
        }
        source = inner.source();
    }
    false
}
