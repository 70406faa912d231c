//! Server dependencies for actions (using traits for testability)
//!
//! This module provides the central dependency container used by the OTP
//! actions. All external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use growtel::{GrowtelError, GrowtelService};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::otp::{DeliveryError, OtpRecord};
use crate::kernel::{BaseCrmSync, BaseOtpStore, BaseSmsGateway, DeliveryResult};

// =============================================================================
// GrowtelService Adapter (implements BaseSmsGateway trait)
// =============================================================================

/// Wrapper around GrowtelService that implements BaseSmsGateway trait
pub struct GrowtelAdapter(pub Arc<GrowtelService>);

impl GrowtelAdapter {
    pub fn new(service: Arc<GrowtelService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseSmsGateway for GrowtelAdapter {
    async fn send(&self, phone: &str, message: &str) -> DeliveryResult {
        self.0
            .send_sms(phone, message)
            .await
            .map(|_| ())
            .map_err(into_delivery_error)
    }
}

fn into_delivery_error(err: GrowtelError) -> DeliveryError {
    match err {
        GrowtelError::Timeout => DeliveryError::Timeout,
        GrowtelError::Rejected { body, .. } => DeliveryError::Rejected { details: body },
        GrowtelError::Http { status, .. } => {
            DeliveryError::Transport(format!("Request failed with status code {}", status))
        }
        GrowtelError::Transport(message) => DeliveryError::Transport(message),
    }
}

// =============================================================================
// Postgres OTP store (implements BaseOtpStore trait)
// =============================================================================

/// OTP store backed by the `otps` table
pub struct PostgresOtpStore {
    pool: PgPool,
}

impl PostgresOtpStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseOtpStore for PostgresOtpStore {
    async fn upsert(&self, record: &OtpRecord) -> Result<()> {
        record.upsert(&self.pool).await
    }

    async fn find(&self, phone: &str) -> Result<Option<OtpRecord>> {
        OtpRecord::find_by_phone(phone, &self.pool).await
    }

    async fn delete(&self, phone: &str) -> Result<()> {
        OtpRecord::delete_by_phone(phone, &self.pool).await
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub otp_store: Arc<dyn BaseOtpStore>,
    pub sms: Arc<dyn BaseSmsGateway>,
    /// Best-effort; failures are logged and ignored
    pub crm: Arc<dyn BaseCrmSync>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        otp_store: Arc<dyn BaseOtpStore>,
        sms: Arc<dyn BaseSmsGateway>,
        crm: Arc<dyn BaseCrmSync>,
    ) -> Self {
        Self {
            otp_store,
            sms,
            crm,
        }
    }
}
