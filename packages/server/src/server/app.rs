//! Application setup and server configuration.

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use growtel::{GrowtelOptions, GrowtelService};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{Config, Environment};
use crate::kernel::{
    BaseCrmSync, GrowtelAdapter, LeadSquaredClient, LeadSquaredOptions, NoopCrmSync,
    PostgresOtpStore, ServerDeps,
};
use crate::server::response::ApiResponse;
use crate::server::routes::{method_not_allowed, send_otp_handler, verify_otp_handler};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub server_deps: Arc<ServerDeps>,
    pub environment: Environment,
}

/// Build production dependencies from configuration
pub fn build_server_deps(pool: PgPool, config: &Config) -> ServerDeps {
    // Growtel credentials come from configuration, never from source
    let growtel = Arc::new(GrowtelService::new(GrowtelOptions {
        api_key: config.growtel_api_key.clone(),
        sender_id: config.growtel_sender_id.clone(),
        entity_id: config.growtel_entity_id.clone(),
        template_id: config.growtel_template_id.clone(),
        base_url: config.growtel_base_url.clone(),
        timeout: config.sms_timeout,
    }));

    let crm: Arc<dyn BaseCrmSync> = match &config.leadsquared {
        Some(leadsquared) => Arc::new(LeadSquaredClient::new(LeadSquaredOptions {
            host: leadsquared.host.clone(),
            access_key: leadsquared.access_key.clone(),
            secret_key: leadsquared.secret_key.clone(),
            timeout: config.crm_timeout,
        })),
        None => {
            tracing::warn!("LeadSquared not configured, CRM sync disabled");
            Arc::new(NoopCrmSync)
        }
    };

    ServerDeps::new(
        Arc::new(PostgresOtpStore::new(pool)),
        Arc::new(GrowtelAdapter::new(growtel)),
        crm,
    )
}

/// Turn a handler panic into the generic 500 body
fn panic_response(err: Box<dyn Any + Send + 'static>, environment: Environment) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };

    tracing::error!(panic = %detail, "Unexpected error in request handler");

    // Both routes, verify included, hide the panic text outside development
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::internal(environment, detail)),
    )
        .into_response()
}

/// Build the Axum application router
///
/// Routes:
/// - POST /api/send-otp
/// - POST /api/verify-otp (plus OPTIONS preflight, permissive CORS)
///
/// Any other method on either path answers 405 with the JSON envelope.
pub fn build_app(server_deps: ServerDeps, environment: Environment) -> Router {
    let app_state = AxumAppState {
        server_deps: Arc::new(server_deps),
        environment,
    };

    // CORS for the verify endpoint - any origin, preflight answered with an empty 200
    let verify_cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    // Inside the CORS layer so panic responses still carry CORS headers
    let catch_panic = CatchPanicLayer::custom(move |err: Box<dyn Any + Send + 'static>| {
        panic_response(err, environment)
    });

    Router::new()
        .route(
            "/api/send-otp",
            post(send_otp_handler)
                .fallback(method_not_allowed)
                .layer(catch_panic.clone()),
        )
        .route(
            "/api/verify-otp",
            post(verify_otp_handler)
                .fallback(method_not_allowed)
                .layer(ServiceBuilder::new().layer(verify_cors).layer(catch_panic)),
        )
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
}
