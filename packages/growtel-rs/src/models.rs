use serde_json::Value;

/// Status code Growtel reports when a message has been accepted for delivery.
pub const STATUS_ACCEPTED: i64 = 100;

/// Body returned by the Growtel SMS endpoint.
///
/// Growtel answers HTTP 200 even for rejected messages, so the `status`
/// field inside the body is the only reliable delivery indicator. The raw
/// body is kept around for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SmsResponse {
    pub body: Value,
}

impl SmsResponse {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// Parse a response body, keeping non-JSON payloads as a string value.
    pub fn from_text(text: &str) -> Self {
        let body = serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()));
        Self { body }
    }

    pub fn status(&self) -> Option<i64> {
        self.body.get("status").and_then(Value::as_i64)
    }

    pub fn is_accepted(&self) -> bool {
        self.status() == Some(STATUS_ACCEPTED)
    }
}
