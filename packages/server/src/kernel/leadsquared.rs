//! LeadSquared CRM client
//!
//! Captures a lead for every phone number that receives an OTP. Used as the
//! `BaseCrmSync` implementation; callers treat every failure as non-critical.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::kernel::BaseCrmSync;

const LEAD_SOURCE: &str = "Jaro Connect App";

#[derive(Debug, Clone)]
pub struct LeadSquaredOptions {
    /// API host, e.g. `https://api-in21.leadsquared.com`
    pub host: String,
    pub access_key: String,
    pub secret_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct LeadAttribute<'a> {
    #[serde(rename = "Attribute")]
    attribute: &'a str,
    #[serde(rename = "Value")]
    value: &'a str,
}

pub struct LeadSquaredClient {
    client: Client,
    options: LeadSquaredOptions,
}

impl LeadSquaredClient {
    pub fn new(options: LeadSquaredOptions) -> Self {
        Self {
            client: Client::new(),
            options,
        }
    }

    /// Create or update the lead for a phone number
    pub async fn capture_lead(&self, phone: &str) -> Result<()> {
        let url = format!(
            "{}/v2/LeadManagement.svc/Lead.Capture",
            self.options.host.trim_end_matches('/')
        );

        let attributes = [
            LeadAttribute {
                attribute: "Phone",
                value: phone,
            },
            LeadAttribute {
                attribute: "Source",
                value: LEAD_SOURCE,
            },
            LeadAttribute {
                attribute: "SearchBy",
                value: "Phone",
            },
        ];

        debug!("Capturing LeadSquared lead");

        let response = self
            .client
            .post(url)
            .query(&[
                ("accessKey", self.options.access_key.as_str()),
                ("secretKey", self.options.secret_key.as_str()),
            ])
            .json(&attributes)
            .timeout(self.options.timeout)
            .send()
            .await
            .context("LeadSquared request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("LeadSquared API error {}: {}", status, body);
        }

        info!("LeadSquared lead captured");
        Ok(())
    }
}

#[async_trait]
impl BaseCrmSync for LeadSquaredClient {
    async fn notify(&self, phone: &str) -> Result<()> {
        self.capture_lead(phone).await
    }
}

/// CRM sync used when LeadSquared is not configured
pub struct NoopCrmSync;

#[async_trait]
impl BaseCrmSync for NoopCrmSync {
    async fn notify(&self, _phone: &str) -> Result<()> {
        debug!("CRM sync disabled, skipping");
        Ok(())
    }
}
