//! Verify OTP action

use chrono::Utc;
use tracing::{error, info, warn};

use crate::domains::otp::errors::{OtpError, ValidationError};
use crate::domains::otp::models::{mask_phone_number, strip_whitespace};
use crate::domains::otp::types::{OtpVerified, SubmittedCode};
use crate::kernel::ServerDeps;

/// Verify a submitted code against the stored OTP for a phone number.
///
/// Success and expiry both consume the record. A mismatch leaves it in
/// place so the user can retry until it expires.
pub async fn verify_otp(
    phone_number: &str,
    code: &str,
    deps: &ServerDeps,
) -> Result<OtpVerified, OtpError> {
    verify_submitted_code(phone_number, SubmittedCode::Text(code), deps).await
}

/// Same as [`verify_otp`] for a code that may not have arrived as text.
pub async fn verify_submitted_code(
    phone_number: &str,
    code: SubmittedCode<'_>,
    deps: &ServerDeps,
) -> Result<OtpVerified, OtpError> {
    if phone_number.is_empty() || code.is_empty() {
        return Err(ValidationError::VerificationFieldsRequired.into());
    }

    let phone = strip_whitespace(phone_number);
    let masked = mask_phone_number(&phone);

    // A failed lookup is indistinguishable from a missing code for the caller
    let record = match deps.otp_store.find(&phone).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            info!(phone = %masked, "OTP not found");
            return Err(OtpError::NotFound);
        }
        Err(e) => {
            error!(phone = %masked, "OTP lookup failed: {:#}", e);
            return Err(OtpError::NotFound);
        }
    };

    if record.is_expired_at(Utc::now()) {
        consume(&phone, &masked, deps).await;
        info!(phone = %masked, "OTP expired");
        return Err(OtpError::Expired);
    }

    let matched = match code {
        SubmittedCode::Text(code) => record.matches(code),
        SubmittedCode::Other => false,
    };
    if !matched {
        warn!(phone = %masked, "Invalid OTP submitted");
        return Err(OtpError::Mismatch);
    }

    consume(&phone, &masked, deps).await;
    info!(phone = %masked, "OTP verified");

    Ok(OtpVerified {
        phone_number: phone,
    })
}

async fn consume(phone: &str, masked: &str, deps: &ServerDeps) {
    if let Err(e) = deps.otp_store.delete(phone).await {
        error!(phone = %masked, "Failed to delete OTP record: {:#}", e);
    }
}
