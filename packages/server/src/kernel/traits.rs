// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The OTP lifecycle rules live in domains/otp and call through these traits.
//
// Naming convention: Base* for trait names (e.g., BaseOtpStore, BaseSmsGateway)

use anyhow::Result;
use async_trait::async_trait;

use crate::domains::otp::{DeliveryError, OtpRecord};

// =============================================================================
// OTP Store Trait (Infrastructure - keyed persistence)
// =============================================================================

/// Keyed store holding at most one pending OTP per phone.
///
/// Implementations must make each operation atomic per key; concurrent
/// upserts for the same phone resolve as last-write-wins.
#[async_trait]
pub trait BaseOtpStore: Send + Sync {
    /// Insert the record, replacing any existing record for the same phone
    async fn upsert(&self, record: &OtpRecord) -> Result<()>;

    /// Fetch the record for a phone, if one exists
    async fn find(&self, phone: &str) -> Result<Option<OtpRecord>>;

    /// Remove the record for a phone (absent records are not an error)
    async fn delete(&self, phone: &str) -> Result<()>;
}

// =============================================================================
// SMS Gateway Trait (Infrastructure - message delivery)
// =============================================================================

pub type DeliveryResult = std::result::Result<(), DeliveryError>;

#[async_trait]
pub trait BaseSmsGateway: Send + Sync {
    /// Send one message. Ok only when the gateway confirms acceptance.
    async fn send(&self, phone: &str, message: &str) -> DeliveryResult;
}

// =============================================================================
// CRM Sync Trait (Infrastructure - best-effort lead notification)
// =============================================================================

#[async_trait]
pub trait BaseCrmSync: Send + Sync {
    /// Tell the CRM about a phone number that requested an OTP
    async fn notify(&self, phone: &str) -> Result<()>;
}
