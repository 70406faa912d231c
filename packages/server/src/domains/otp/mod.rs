//! OTP domain - phone number one-time passcodes
//!
//! Lifecycle: generate → persist → deliver → verify-or-expire → consume.
//!
//! Responsibilities:
//! - Phone number validation and normalization
//! - Code generation and expiry rules
//! - Issuing codes over SMS (with best-effort CRM sync)
//! - Verifying and consuming stored codes

pub mod actions;
pub mod errors;
pub mod message;
pub mod models;
pub mod types;

pub use errors::{DeliveryError, OtpError, ValidationError};
pub use models::{OtpRecord, OTP_EXPIRY};
pub use types::{OtpSent, OtpVerified, SubmittedCode};
