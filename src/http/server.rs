//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the `/cookie` handlers
//! - Run the compliance middleware in front of every route
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and stop on the shutdown broadcast

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Extension, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::compliance::{evaluate, ComplianceMode, Outcome, RequestCompliance};
use crate::config::ServerConfig;
use crate::http::request::{raw_headers, request_id, MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response::{rejection_response, ComplianceReport};
use crate::lifecycle::shutdown;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub mode: Arc<ComplianceMode>,
    pub record_violations: bool,
}

/// HTTP server exposing the compliance report endpoint.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server running under `mode`.
    pub fn new(config: ServerConfig, mode: Arc<ComplianceMode>) -> Self {
        let state = AppState {
            mode,
            record_violations: config.compliance.record_violations,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/cookie", get(cookie_handler))
            .route("/cookie/", get(cookie_handler))
            .route("/cookie/{*path}", get(cookie_handler))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                compliance_middleware,
            ))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config().timeouts.request_secs,
            record_violations = self.config().compliance.record_violations,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Validate Host, parse Cookie, and either refuse the request or hand the
/// result to the route.
async fn compliance_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let raw = raw_headers(request.headers(), request.uri());

    match evaluate(&raw, &state.mode) {
        Outcome::Reject(rejection) => {
            tracing::info!(
                request_id = %request_id(request.headers()),
                reason = %rejection.reason,
                "Request rejected"
            );
            metrics::record_violations(&rejection.violations);
            metrics::record_rejection(rejection.reason);
            metrics::record_request(400);
            rejection_response(&rejection)
        }
        Outcome::Proceed(compliance) => {
            metrics::record_violations(&compliance.violations);
            request.extensions_mut().insert(compliance);
            let response = next.run(request).await;
            metrics::record_request(response.status().as_u16());
            response
        }
    }
}

async fn cookie_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Extension(compliance): Extension<RequestCompliance>,
) -> ComplianceReport {
    tracing::debug!(
        request_id = %request_id(&headers),
        host = %compliance.authority.host,
        cookies = ?compliance.cookies.len(),
        violations = compliance.violations.len(),
        "Reporting cookies"
    );
    ComplianceReport::new(state.mode.name(), compliance, state.record_violations)
}
