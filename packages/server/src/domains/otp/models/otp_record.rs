use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::time::Duration;

/// How long an issued code stays valid.
pub const OTP_EXPIRY: Duration = Duration::from_secs(5 * 60);

/// Inclusive range codes are drawn from; every value has exactly six digits.
const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

/// OtpRecord - the single pending code for a phone number
///
/// `phone` is the primary key: issuing a new code replaces the old row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OtpRecord {
    pub phone: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Create a record with a freshly generated code.
    pub fn issue(phone: String, issued_at: DateTime<Utc>) -> Self {
        Self {
            phone,
            code: generate_code(),
            issued_at,
        }
    }

    /// True once `OTP_EXPIRY` or more has elapsed since issuance.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        // A negative elapsed time (clock skew between hosts) counts as fresh
        match now.signed_duration_since(self.issued_at).to_std() {
            Ok(elapsed) => elapsed >= OTP_EXPIRY,
            Err(_) => false,
        }
    }

    /// Exact comparison against a submitted code.
    pub fn matches(&self, submitted: &str) -> bool {
        self.code == submitted
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl OtpRecord {
    /// Insert or replace the record for this phone
    pub async fn upsert(&self, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO otps (phone, code, issued_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (phone) DO UPDATE
            SET code = EXCLUDED.code,
                issued_at = EXCLUDED.issued_at
            "#,
        )
        .bind(&self.phone)
        .bind(&self.code)
        .bind(self.issued_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find the pending record for a phone
    pub async fn find_by_phone(phone: &str, pool: &PgPool) -> Result<Option<Self>> {
        let record = sqlx::query_as::<_, OtpRecord>(
            "SELECT phone, code, issued_at FROM otps WHERE phone = $1",
        )
        .bind(phone)
        .fetch_optional(pool)
        .await?;
        Ok(record)
    }

    /// Delete the record for a phone (no-op if absent)
    pub async fn delete_by_phone(phone: &str, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM otps WHERE phone = $1")
            .bind(phone)
            .execute(pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Generate a six digit code, uniform over 100000..=999999.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(CODE_MIN..=CODE_MAX).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_issued_at(issued_at: DateTime<Utc>) -> OtpRecord {
        OtpRecord {
            phone: "+14155551234".to_string(),
            code: "483920".to_string(),
            issued_at,
        }
    }

    #[test]
    fn test_generated_code_format() {
        for _ in 0..1000 {
            let code = generate_code();
            assert_eq!(code.len(), 6, "Code should be six characters: {}", code);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.chars().next(), Some('0'), "No leading zero");
        }
    }

    #[test]
    fn test_generated_codes_vary() {
        let codes: std::collections::HashSet<String> = (0..50).map(|_| generate_code()).collect();
        assert!(codes.len() > 1, "Codes should not repeat every time");
    }

    #[test]
    fn test_issue_sets_phone_and_timestamp() {
        let now = Utc::now();
        let record = OtpRecord::issue("+14155551234".to_string(), now);
        assert_eq!(record.phone, "+14155551234");
        assert_eq!(record.issued_at, now);
        assert_eq!(record.code.len(), 6);
    }

    #[test]
    fn test_fresh_record_is_not_expired() {
        let issued = Utc::now();
        let record = record_issued_at(issued);
        assert!(!record.is_expired_at(issued));
        assert!(!record.is_expired_at(issued + chrono::Duration::seconds(60)));
        assert!(!record.is_expired_at(issued + chrono::Duration::seconds(299)));
    }

    #[test]
    fn test_record_expires_at_five_minutes() {
        let issued = Utc::now();
        let record = record_issued_at(issued);
        assert!(record.is_expired_at(issued + chrono::Duration::minutes(5)));
        assert!(record.is_expired_at(issued + chrono::Duration::minutes(30)));
    }

    #[test]
    fn test_future_timestamp_is_not_expired() {
        let now = Utc::now();
        let record = record_issued_at(now + chrono::Duration::seconds(30));
        assert!(!record.is_expired_at(now));
    }

    #[test]
    fn test_matches_is_exact() {
        let record = record_issued_at(Utc::now());
        assert!(record.matches("483920"));
        assert!(!record.matches("483921"));
        assert!(!record.matches(" 483920"));
        assert!(!record.matches("48392"));
    }
}
