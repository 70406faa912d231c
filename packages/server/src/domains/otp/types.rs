//! OTP domain data types
//!
//! Simple, serializable types returned by OTP actions.

use serde::{Deserialize, Serialize};

/// Result of issuing an OTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpSent {
    pub phone_number: String,
}

/// Result of verifying an OTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpVerified {
    pub phone_number: String,
}

/// A code as the client submitted it.
///
/// Only text can match a stored code; anything else (a JSON number, say)
/// still goes through lookup and expiry but always ends in a mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmittedCode<'a> {
    Text(&'a str),
    Other,
}

impl SubmittedCode<'_> {
    pub fn is_empty(&self) -> bool {
        matches!(self, SubmittedCode::Text(code) if code.is_empty())
    }
}
