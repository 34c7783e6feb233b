//! HTTP API server for essay feedback

use crate::config::ServerConfig;
use crate::error::Result;
use crate::services::GatewaySource;
use crate::types::EssayFeedbackResult;
use crate::validation::validate_request;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{debug, info, info_span, Instrument};

/// Content type stamped on every response
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// API server state
#[derive(Clone)]
struct AppState {
    /// Builds a gateway per request so credentials are read at call time
    source: Arc<dyn GatewaySource>,
    /// Instance ID
    instance_id: String,
}

/// API server
pub struct ApiServer {
    config: ServerConfig,
    source: Arc<dyn GatewaySource>,
    instance_id: String,
}

impl ApiServer {
    /// Create new API server
    pub fn new(config: ServerConfig, source: Arc<dyn GatewaySource>) -> Self {
        let instance_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
        Self {
            config,
            source,
            instance_id,
        }
    }

    /// Get instance ID
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Router with all routes and middleware applied
    pub fn router(&self) -> Router {
        build_router(
            &self.config.essay_path,
            self.source.clone(),
            self.instance_id.clone(),
        )
    }

    /// Serve until Ctrl-C
    pub async fn serve(self) -> anyhow::Result<()> {
        let router = self.router();
        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;

        info!(
            "API server [{}] listening on http://{}{}",
            self.instance_id,
            listener.local_addr()?,
            self.config.essay_path
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server [{}] shut down", self.instance_id);
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        debug!("Ctrl-C handler unavailable; serving until the process exits");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, stopping API server gracefully...");
}

/// Build router
pub fn build_router(
    essay_path: &str,
    source: Arc<dyn GatewaySource>,
    instance_id: String,
) -> Router {
    let state = AppState {
        source,
        instance_id,
    };

    Router::new()
        // Essay feedback (method dispatch happens in the handler)
        .route(essay_path, any(essay_handler))
        // Health check
        .route("/health", get(health_handler))
        // State
        .with_state(state)
        // Headers present on every response, errors included
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSON_CONTENT_TYPE),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Essay feedback handler
///
/// `OPTIONS` answers the CORS preflight, `POST` runs the pipeline, anything
/// else is refused. A body the server could not buffer (over the size limit,
/// for instance) is answered with a JSON error under the rejection's status.
async fn essay_handler(
    State(state): State<AppState>,
    method: Method,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    match method {
        Method::OPTIONS => StatusCode::NO_CONTENT.into_response(),
        Method::POST => {
            let body = match body {
                Ok(body) => body,
                Err(rejection) => return body_rejection_response(rejection),
            };
            let request_id = uuid::Uuid::new_v4();
            let span = info_span!("essay", %request_id);
            match generate_feedback(&state, &body).instrument(span).await {
                Ok(result) => (StatusCode::OK, Json(result)).into_response(),
                Err(err) => err.into_response(),
            }
        }
        other => {
            debug!("Rejecting {} on essay endpoint", other);
            (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(json!({ "error": "Method not allowed" })),
            )
                .into_response()
        }
    }
}

fn body_rejection_response(rejection: BytesRejection) -> Response {
    let status = rejection.status();
    let message = rejection.body_text();
    info!("Essay body rejected ({}): {}", status, message);
    (status, Json(json!({ "error": message }))).into_response()
}

/// Validate, then resolve credentials, then call the provider
async fn generate_feedback(state: &AppState, body: &[u8]) -> Result<EssayFeedbackResult> {
    // A body that is not JSON fails validation as a non-object payload
    let payload: Value = serde_json::from_slice(body).unwrap_or_else(|e| {
        debug!("Essay body is not JSON: {}", e);
        Value::Null
    });

    let request = validate_request(&payload)?;
    info!(
        "Essay request: unit {} {} ({}), {} chars",
        request.unit_id,
        request.essay_type,
        request.language,
        request.essay_text.chars().count()
    );

    let gateway = state.source.gateway()?;
    gateway.generate(&request).await
}

/// Health check handler
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    instance_id: String,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        instance_id: state.instance_id.clone(),
    })
}
