// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the webhook gateway.
//!
//! Handles the subscription handshake, message deliveries, GET /health and
//! GET /metrics.

use std::collections::HashMap;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use folio_core::FolioError;
use folio_whatsapp::{SIGNATURE_HEADER, parse_webhook, verify_signature};

use crate::server::{GatewayState, WebhookAuth};

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Read a handshake parameter under either its dotted or underscored name.
fn hub_param<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params
        .get(&format!("hub.{name}"))
        .or_else(|| params.get(&format!("hub_{name}")))
        .map(String::as_str)
}

/// Check the delivery signature when an app secret is configured.
pub fn authenticate(
    auth: &WebhookAuth,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), FolioError> {
    let Some(secret) = auth.app_secret.as_deref() else {
        return Ok(());
    };
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if signature.is_empty() {
        return Err(FolioError::Webhook(format!("missing {SIGNATURE_HEADER} header")));
    }
    if !verify_signature(body, signature, secret) {
        return Err(FolioError::Webhook("signature does not match body".to_string()));
    }
    Ok(())
}

/// GET {webhook_path}
///
/// Echoes `hub.challenge` when `hub.mode` is `subscribe` and
/// `hub.verify_token` matches; otherwise 403.
pub async fn verify_subscription(
    State(state): State<GatewayState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mode = hub_param(&params, "mode").unwrap_or_default();
    let token = hub_param(&params, "verify_token").unwrap_or_default();
    let challenge = hub_param(&params, "challenge").unwrap_or_default();

    if mode == "subscribe" && !token.is_empty() && token == state.auth.verify_token {
        info!("webhook subscription verified");
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            challenge.to_string(),
        )
            .into_response()
    } else {
        warn!(mode, "webhook subscription rejected");
        (StatusCode::FORBIDDEN, "Forbidden").into_response()
    }
}

/// POST {webhook_path}
///
/// Runs every message in the delivery through the ingestion pipeline, then
/// acknowledges. Per-message failures never change the response.
pub async fn receive_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(e) = authenticate(&state.auth, &headers, &body) {
        warn!(error = %e, "webhook delivery rejected");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"ok": false, "error": "invalid signature"})),
        )
            .into_response();
    }

    if body.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"ok": false, "error": "empty body"})),
        )
            .into_response();
    }

    debug!(bytes = body.len(), "webhook delivery received");

    let messages = match parse_webhook(&body) {
        Ok(messages) => messages,
        Err(e) => {
            warn!(error = %e, "webhook body is not valid JSON");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"ok": false, "error": "invalid json"})),
            )
                .into_response();
        }
    };

    if messages.is_empty() {
        return (StatusCode::OK, Json(json!({"ok": true, "info": "no messages"}))).into_response();
    }

    let report = state.pipeline.process_batch(messages).await;
    info!(
        processed = report.processed,
        duplicates = report.duplicates,
        skipped = report.skipped,
        failed = report.failed,
        "webhook batch handled"
    );

    (StatusCode::OK, Json(json!({"ok": true}))).into_response()
}

/// GET /health
pub async fn get_public_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// GET /metrics
///
/// Prometheus text exposition, or 404 when no recorder is installed.
pub async fn get_public_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}
