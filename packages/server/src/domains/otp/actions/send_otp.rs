//! Send OTP action

use chrono::Utc;
use tracing::{error, info, warn};

use crate::domains::otp::errors::OtpError;
use crate::domains::otp::message::render_otp_message;
use crate::domains::otp::models::{mask_phone_number, normalize_phone_number, OtpRecord};
use crate::domains::otp::types::OtpSent;
use crate::kernel::ServerDeps;

/// Issue a new OTP for a phone number and deliver it by SMS.
///
/// Order matters:
/// 1. Validation failures return before anything is written.
/// 2. A store failure returns before any SMS is sent.
/// 3. A delivery failure leaves the stored code in place so a late SMS
///    can still be verified.
/// 4. CRM sync runs only after confirmed delivery and never fails the call.
pub async fn send_otp(phone_number: &str, deps: &ServerDeps) -> Result<OtpSent, OtpError> {
    let phone = normalize_phone_number(phone_number)?;
    let masked = mask_phone_number(&phone);

    let record = OtpRecord::issue(phone.clone(), Utc::now());
    deps.otp_store.upsert(&record).await.map_err(|e| {
        error!(phone = %masked, "Database error storing OTP: {:#}", e);
        OtpError::Store(e)
    })?;
    info!(phone = %masked, "OTP stored");

    let message = render_otp_message(&record.code);
    deps.sms.send(&phone, &message).await.map_err(|e| {
        error!(phone = %masked, "SMS delivery failed: {}", e);
        OtpError::Delivery(e)
    })?;
    info!(phone = %masked, "OTP sent successfully");

    if let Err(e) = deps.crm.notify(&phone).await {
        warn!(phone = %masked, "CRM sync failed (non-critical): {:#}", e);
    }

    Ok(OtpSent {
        phone_number: phone,
    })
}
