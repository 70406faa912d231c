//! JSON response envelope and error mapping for the HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Environment;
use crate::domains::otp::{DeliveryError, OtpError};

/// `{ success, message, error?, details? }` body used by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            details: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
            details: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<Value>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Generic 500 body for failures nothing else accounted for
    pub fn internal(environment: Environment, detail: &str) -> Self {
        Self::fail("Internal server error").with_error(diagnostic(
            environment,
            detail.to_string(),
            "Something went wrong",
        ))
    }
}

/// Pick the real diagnostic in development, a fixed string otherwise
fn diagnostic(environment: Environment, detail: impl Into<Value>, generic: &str) -> Value {
    if environment.exposes_diagnostics() {
        detail.into()
    } else {
        Value::String(generic.to_string())
    }
}

/// An `OtpError` bound to the environment it is rendered for
#[derive(Debug)]
pub struct ApiError {
    pub error: OtpError,
    pub environment: Environment,
}

impl ApiError {
    pub fn new(error: OtpError, environment: Environment) -> Self {
        Self { error, environment }
    }

    pub fn status_and_body(&self) -> (StatusCode, ApiResponse) {
        let env = self.environment;
        match &self.error {
            OtpError::Validation(e) => (StatusCode::BAD_REQUEST, ApiResponse::fail(e.to_string())),
            OtpError::NotFound | OtpError::Expired | OtpError::Mismatch => (
                StatusCode::BAD_REQUEST,
                ApiResponse::fail(self.error.to_string()),
            ),
            OtpError::Store(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::fail("Database error").with_error(diagnostic(
                    env,
                    format!("{:#}", e),
                    "Internal server error",
                )),
            ),
            OtpError::Delivery(DeliveryError::Rejected { details }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::fail("SMS failed").with_details(diagnostic(
                    env,
                    details.clone(),
                    "SMS service error",
                )),
            ),
            OtpError::Delivery(DeliveryError::Timeout) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::fail("SMS service timeout").with_error("Network timeout"),
            ),
            OtpError::Delivery(DeliveryError::Transport(message)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::fail("SMS service error").with_error(diagnostic(
                    env,
                    message.clone(),
                    "Internal server error",
                )),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::otp::ValidationError;
    use serde_json::json;

    fn render(error: OtpError, environment: Environment) -> (StatusCode, ApiResponse) {
        ApiError::new(error, environment).status_and_body()
    }

    #[test]
    fn test_validation_is_bad_request() {
        let (status, body) = render(
            ValidationError::InvalidPhoneFormat.into(),
            Environment::Production,
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, ApiResponse::fail("Invalid phone number format"));
    }

    #[test]
    fn test_verification_outcomes_are_bad_request() {
        for (error, message) in [
            (OtpError::NotFound, "OTP not found or expired"),
            (OtpError::Expired, "OTP expired"),
            (OtpError::Mismatch, "Invalid OTP"),
        ] {
            let (status, body) = render(error, Environment::Production);
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body.message, message);
            assert!(!body.success);
            assert!(body.error.is_none());
        }
    }

    #[test]
    fn test_store_error_hides_detail_in_production() {
        let (status, body) = render(
            OtpError::Store(anyhow::anyhow!("connection refused")),
            Environment::Production,
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Database error");
        assert_eq!(body.error, Some(json!("Internal server error")));
    }

    #[test]
    fn test_store_error_shows_detail_in_development() {
        let (_, body) = render(
            OtpError::Store(anyhow::anyhow!("connection refused")),
            Environment::Development,
        );
        assert_eq!(body.error, Some(json!("connection refused")));
    }

    #[test]
    fn test_rejected_sms_details() {
        let gateway_body = json!({"status": 102, "message": "DLT mismatch"});

        let (status, body) = render(
            DeliveryError::Rejected {
                details: gateway_body.clone(),
            }
            .into(),
            Environment::Development,
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "SMS failed");
        assert_eq!(body.details, Some(gateway_body.clone()));

        let (_, body) = render(
            DeliveryError::Rejected {
                details: gateway_body,
            }
            .into(),
            Environment::Production,
        );
        assert_eq!(body.details, Some(json!("SMS service error")));
        assert!(body.error.is_none());
    }

    #[test]
    fn test_timeout_message_is_fixed() {
        for env in [Environment::Development, Environment::Production] {
            let (_, body) = render(DeliveryError::Timeout.into(), env);
            assert_eq!(body.message, "SMS service timeout");
            assert_eq!(body.error, Some(json!("Network timeout")));
        }
    }

    #[test]
    fn test_transport_error() {
        let (_, body) = render(
            DeliveryError::Transport("dns failure".to_string()).into(),
            Environment::Production,
        );
        assert_eq!(body.message, "SMS service error");
        assert_eq!(body.error, Some(json!("Internal server error")));
    }

    #[test]
    fn test_internal_body() {
        let body = ApiResponse::internal(Environment::Production, "boom");
        assert_eq!(body.message, "Internal server error");
        assert_eq!(body.error, Some(json!("Something went wrong")));

        let body = ApiResponse::internal(Environment::Development, "boom");
        assert_eq!(body.error, Some(json!("boom")));
    }

    #[test]
    fn test_serialization_omits_empty_fields() {
        let value = serde_json::to_value(ApiResponse::ok("OTP sent successfully")).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "message": "OTP sent successfully"})
        );
    }
}
