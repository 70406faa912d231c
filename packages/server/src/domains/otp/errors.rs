//! OTP domain errors

use serde_json::Value;

/// Bad or missing client input. Raised before any side effect happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Phone number is required")]
    PhoneRequired,

    #[error("Invalid phone number format")]
    InvalidPhoneFormat,

    #[error("Phone number and OTP are required")]
    VerificationFieldsRequired,
}

/// SMS delivery failed or was not confirmed by the gateway.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DeliveryError {
    /// Timed out or the connection was reset; the message may still arrive.
    #[error("SMS gateway timed out")]
    Timeout,

    /// The gateway answered but did not accept the message.
    #[error("SMS gateway rejected the message")]
    Rejected { details: Value },

    #[error("SMS gateway error: {0}")]
    Transport(String),
}

/// Outcome of an issue or verify request that did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to store OTP: {0:#}")]
    Store(anyhow::Error),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("OTP not found or expired")]
    NotFound,

    #[error("OTP expired")]
    Expired,

    #[error("Invalid OTP")]
    Mismatch,
}

impl OtpError {
    /// Errors the client can fix by changing its request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OtpError::Validation(_) | OtpError::NotFound | OtpError::Expired | OtpError::Mismatch
        )
    }
}
