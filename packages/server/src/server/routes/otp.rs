use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::domains::otp::{actions, SubmittedCode};
use crate::server::app::AxumAppState;
use crate::server::response::{ApiError, ApiResponse};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    #[serde(default)]
    pub phone_number: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub phone_number: Option<Value>,
    #[serde(default)]
    pub otp: Option<Value>,
}

/// Null, `""`, `false` and `0` count as not supplied
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Field text for lookups; non-string values use their JSON form
fn field_text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(value) if !is_blank(&value) => value.to_string(),
        _ => String::new(),
    }
}

/// An absent or unparseable body is treated as a body with no fields
fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!("Request body rejected: {}", rejection);
            T::default()
        }
    }
}

/// POST /api/send-otp
pub async fn send_otp_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Result<Json<SendOtpRequest>, JsonRejection>,
) -> Response {
    let request = body_or_default(payload);
    let phone_number = match request.phone_number {
        Some(Value::String(phone)) => phone,
        Some(value) if !is_blank(&value) => {
            error!("Send OTP error: phoneNumber is not a string");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::internal(
                    state.environment,
                    "phoneNumber must be a string",
                )),
            )
                .into_response();
        }
        _ => String::new(),
    };

    match actions::send_otp(&phone_number, &state.server_deps).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::ok("OTP sent successfully")),
        )
            .into_response(),
        Err(e) => ApiError::new(e, state.environment).into_response(),
    }
}

/// POST /api/verify-otp
pub async fn verify_otp_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> Response {
    let request = body_or_default(payload);
    let phone_number = field_text(request.phone_number);
    let code = match &request.otp {
        Some(Value::String(otp)) => SubmittedCode::Text(otp),
        Some(value) if !is_blank(value) => SubmittedCode::Other,
        _ => SubmittedCode::Text(""),
    };

    match actions::verify_submitted_code(&phone_number, code, &state.server_deps).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::ok("OTP verified successfully")),
        )
            .into_response(),
        Err(e) => ApiError::new(e, state.environment).into_response(),
    }
}

/// Fallback for any method a route does not accept
pub async fn method_not_allowed() -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiResponse::fail("Method not allowed")),
    )
}
