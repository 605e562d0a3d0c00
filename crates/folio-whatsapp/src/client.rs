// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graph API client for outbound text replies.
//!
//! Every send is a single attempt bounded by the configured timeout. Failures
//! are reported in the returned [`SendReceipt`], never as errors: a reply
//! that cannot be delivered must not undo the conversation turn.

use std::time::Duration;

use async_trait::async_trait;
use folio_config::model::WhatsAppConfig;
use folio_core::types::{AdapterType, HealthStatus, SendReceipt};
use folio_core::{FolioError, OutboundSender, PluginAdapter};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::{debug, warn};

/// Request body for a plain text message.
#[derive(Debug, Serialize)]
struct TextMessageRequest<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    message_type: &'static str,
    text: TextBody<'a>,
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

/// Sends text replies through the WhatsApp Cloud API.
#[derive(Debug, Clone)]
pub struct WhatsAppSender {
    client: reqwest::Client,
    phone_number_url: String,
    timeout: Duration,
}

impl WhatsAppSender {
    /// Build a sender from configuration.
    ///
    /// Requires `whatsapp.access_token` and `whatsapp.phone_number_id`.
    pub fn new(config: &WhatsAppConfig) -> Result<Self, FolioError> {
        let token = required(config.access_token.as_deref(), "whatsapp.access_token")?;
        let phone_number_id =
            required(config.phone_number_id.as_deref(), "whatsapp.phone_number_id")?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
            FolioError::Config(format!("invalid access token header value: {e}"))
        })?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let timeout = Duration::from_secs(config.send_timeout_secs);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FolioError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            phone_number_url: format!(
                "{}/{}/{}",
                config.api_base_url.trim_end_matches('/'),
                config.graph_version,
                phone_number_id
            ),
            timeout,
        })
    }

    /// Endpoint replies are POSTed to.
    pub fn messages_url(&self) -> String {
        format!("{}/messages", self.phone_number_url)
    }
}

fn required<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str, FolioError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(FolioError::Config(format!(
            "{key} is required for the WhatsApp sender"
        ))),
    }
}

#[async_trait]
impl PluginAdapter for WhatsAppSender {
    fn name(&self) -> &str {
        "whatsapp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    /// Looks up the configured phone number, which also validates the token.
    ///
    /// A lookup that exceeds the send timeout is an error rather than a
    /// status, since the API's health is then unknown.
    async fn health_check(&self) -> Result<HealthStatus, FolioError> {
        match self.client.get(&self.phone_number_url).send().await {
            Err(e) if e.is_timeout() => Err(FolioError::Timeout {
                duration: self.timeout,
            }),
            Ok(resp) if resp.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(resp) => Ok(HealthStatus::Unhealthy(format!(
                "Graph API returned {}",
                resp.status()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Graph API unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), FolioError> {
        debug!("WhatsApp sender shutting down");
        Ok(())
    }
}

#[async_trait]
impl OutboundSender for WhatsAppSender {
    async fn send_text(&self, to: &str, text: &str) -> SendReceipt {
        let request = TextMessageRequest {
            messaging_product: "whatsapp",
            to,
            message_type: "text",
            text: TextBody { body: text },
        };

        let response = match self.client.post(self.messages_url()).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                let detail = if e.is_timeout() {
                    format!("request timed out: {e}")
                } else {
                    format!("request failed: {e}")
                };
                warn!(to, error = %e, "outbound send failed before a response");
                return SendReceipt::transport_failure(detail);
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => format!("<unreadable body: {e}>"),
        };

        if status.is_success() {
            debug!(to, status = status.as_u16(), "reply delivered");
            SendReceipt::delivered(status.as_u16(), body)
        } else {
            warn!(to, status = status.as_u16(), body = %body, "reply rejected");
            SendReceipt::rejected(status.as_u16(), body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> WhatsAppConfig {
        WhatsAppConfig {
            access_token: Some("test-token".into()),
            phone_number_id: Some("PHONE123".into()),
            api_base_url: base_url.to_string(),
            send_timeout_secs: 2,
            ..WhatsAppConfig::default()
        }
    }

    #[test]
    fn new_requires_credentials() {
        let mut cfg = config("http://localhost");
        cfg.access_token = None;
        assert!(WhatsAppSender::new(&cfg).is_err());

        let mut cfg = config("http://localhost");
        cfg.phone_number_id = Some("  ".into());
        assert!(WhatsAppSender::new(&cfg).is_err());
    }

    #[test]
    fn messages_url_uses_version_and_phone_id() {
        let sender = WhatsAppSender::new(&config("https://graph.example.com/")).unwrap();
        assert_eq!(
            sender.messages_url(),
            "https://graph.example.com/v21.0/PHONE123/messages"
        );
    }

    #[tokio::test]
    async fn send_text_posts_cloud_api_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v21.0/PHONE123/messages"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(serde_json::json!({
                "messaging_product": "whatsapp",
                "to": "5215550001",
                "type": "text",
                "text": {"body": "Hola"}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"messages": [{"id": "wamid.OUT"}]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let sender = WhatsAppSender::new(&config(&server.uri())).unwrap();
        let receipt = sender.send_text("5215550001", "Hola").await;
        assert!(receipt.ok);
        assert_eq!(receipt.status, Some(200));
        assert!(receipt.detail.contains("wamid.OUT"));
    }

    #[tokio::test]
    async fn error_status_is_reported_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string(r#"{"error":{"message":"boom"}}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let sender = WhatsAppSender::new(&config(&server.uri())).unwrap();
        let receipt = sender.send_text("u1", "x").await;
        assert!(!receipt.ok);
        assert_eq!(receipt.status, Some(500));
        assert!(receipt.detail.contains("boom"));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let mut cfg = config(&server.uri());
        cfg.send_timeout_secs = 1;
        let sender = WhatsAppSender::new(&cfg).unwrap();

        let started = std::time::Instant::now();
        let receipt = sender.send_text("u1", "x").await;
        assert!(started.elapsed() < Duration::from_secs(4));
        assert!(!receipt.ok);
        assert_eq!(receipt.status, None);
        assert!(receipt.detail.contains("timed out"), "got: {}", receipt.detail);
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_failure() {
        // Port 1 is reserved and refuses connections.
        let sender = WhatsAppSender::new(&config("http://127.0.0.1:1")).unwrap();
        let receipt = sender.send_text("u1", "x").await;
        assert!(!receipt.ok);
        assert_eq!(receipt.status, None);
        assert!(!receipt.detail.is_empty());
    }

    #[tokio::test]
    async fn health_check_reflects_graph_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v21.0/PHONE123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "PHONE123"
            })))
            .mount(&server)
            .await;

        let sender = WhatsAppSender::new(&config(&server.uri())).unwrap();
        assert_eq!(sender.health_check().await.unwrap(), HealthStatus::Healthy);

        let broken = WhatsAppSender::new(&config("http://127.0.0.1:1")).unwrap();
        assert!(matches!(
            broken.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }

    #[tokio::test]
    async fn slow_health_check_is_a_timeout_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let mut cfg = config(&server.uri());
        cfg.send_timeout_secs = 1;
        let sender = WhatsAppSender::new(&cfg).unwrap();

        match sender.health_check().await {
            Err(FolioError::Timeout { duration }) => {
                assert_eq!(duration, Duration::from_secs(1));
            }
            other => panic!("expected a timeout error, got {other:?}"),
        }
    }
}
