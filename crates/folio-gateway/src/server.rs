// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the webhook gateway.

use std::sync::Arc;

use axum::{Router, routing::get};
use folio_core::FolioError;
use folio_intake::IngestionPipeline;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Health state for the public health/metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Optional Prometheus metrics render function.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl HealthState {
    pub fn new(prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>) -> Self {
        Self {
            start_time: std::time::Instant::now(),
            prometheus_render,
        }
    }
}

/// Secrets used to authenticate the platform's webhook calls.
#[derive(Clone)]
pub struct WebhookAuth {
    /// Shared secret echoed back during the subscription handshake.
    pub verify_token: String,
    /// When set, POST bodies must carry a valid `X-Hub-Signature-256`.
    pub app_secret: Option<String>,
}

impl std::fmt::Debug for WebhookAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookAuth")
            .field("verify_token", &"[redacted]")
            .field("app_secret", &self.app_secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: Arc<IngestionPipeline>,
    pub auth: WebhookAuth,
    pub health: HealthState,
}

/// Gateway server configuration (mirrors `GatewayConfig` from folio-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Route for both the GET handshake and POST deliveries.
    pub webhook_path: String,
}

/// Build the gateway router:
/// - GET `{webhook_path}`: subscription handshake
/// - POST `{webhook_path}`: message deliveries
/// - GET /health, GET /metrics
pub fn build_router(config: &ServerConfig, state: GatewayState) -> Router {
    Router::new()
        .route(
            &config.webhook_path,
            get(handlers::verify_subscription).post(handlers::receive_webhook),
        )
        .route("/health", get(handlers::get_public_health))
        .route("/metrics", get(handlers::get_public_metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), FolioError> {
    let app = build_router(config, state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FolioError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!(webhook_path = %config.webhook_path, "gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| FolioError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_auth_debug_redacts_secrets() {
        let auth = WebhookAuth {
            verify_token: "vt-secret".into(),
            app_secret: Some("app-secret".into()),
        };
        let debug = format!("{auth:?}");
        assert!(!debug.contains("vt-secret"));
        assert!(!debug.contains("app-secret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            webhook_path: "/webhook".to_string(),
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
        assert!(debug.contains("/webhook"));
    }
}
