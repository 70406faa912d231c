use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Deployment environment; controls how much diagnostic detail reaches clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    /// Parse `APP_ENV`; anything unrecognized is treated as production
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Environment::Development,
            _ => Environment::Production,
        }
    }

    /// Whether error responses may carry internal error messages
    pub fn exposes_diagnostics(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// LeadSquared credentials; CRM sync is disabled when absent
#[derive(Debug, Clone)]
pub struct LeadSquaredConfig {
    pub host: String,
    pub access_key: String,
    pub secret_key: String,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub environment: Environment,
    pub growtel_api_key: String,
    pub growtel_sender_id: String,
    pub growtel_entity_id: String,
    pub growtel_template_id: String,
    pub growtel_base_url: String,
    pub sms_timeout: Duration,
    pub leadsquared: Option<LeadSquaredConfig>,
    pub crm_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            environment: env::var("APP_ENV")
                .map(|v| Environment::parse(&v))
                .unwrap_or_default(),
            growtel_api_key: env::var("GROWTEL_API_KEY")
                .context("GROWTEL_API_KEY must be set")?,
            growtel_sender_id: env::var("GROWTEL_SENDER_ID")
                .context("GROWTEL_SENDER_ID must be set")?,
            growtel_entity_id: env::var("GROWTEL_ENTITY_ID")
                .context("GROWTEL_ENTITY_ID must be set")?,
            growtel_template_id: env::var("GROWTEL_TEMPLATE_ID")
                .context("GROWTEL_TEMPLATE_ID must be set")?,
            growtel_base_url: env::var("GROWTEL_BASE_URL")
                .unwrap_or_else(|_| growtel::DEFAULT_BASE_URL.to_string()),
            sms_timeout: duration_secs_var("SMS_TIMEOUT_SECS", 10)?,
            leadsquared: leadsquared_from_env(),
            crm_timeout: duration_secs_var("CRM_TIMEOUT_SECS", 10)?,
        })
    }
}

fn duration_secs_var(key: &str, default: u64) -> Result<Duration> {
    match env::var(key) {
        Ok(value) => {
            let secs: u64 = value
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", key))?;
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

fn leadsquared_from_env() -> Option<LeadSquaredConfig> {
    Some(LeadSquaredConfig {
        host: env::var("LEADSQUARED_HOST").ok()?,
        access_key: env::var("LEADSQUARED_ACCESS_KEY").ok()?,
        secret_key: env::var("LEADSQUARED_SECRET_KEY").ok()?,
    })
}
