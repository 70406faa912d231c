use chrono::{DateTime, Duration, Utc};
use server_core::domains::otp::OtpRecord;

pub const PHONE: &str = "+14155551234";

/// A record as if it had been issued `age` ago
pub fn record_issued_ago(phone: &str, code: &str, age: Duration) -> OtpRecord {
    record_issued_at(phone, code, Utc::now() - age)
}

pub fn record_issued_at(phone: &str, code: &str, issued_at: DateTime<Utc>) -> OtpRecord {
    OtpRecord {
        phone: phone.to_string(),
        code: code.to_string(),
        issued_at,
    }
}
