// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock outbound sender for deterministic testing.
//!
//! `MockSender` implements `OutboundSender` and records every attempted
//! reply, including attempts it was told to reject.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use folio_core::types::{AdapterType, HealthStatus, SendReceipt};
use folio_core::{FolioError, OutboundSender, PluginAdapter};

/// One captured `send_text` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub to: String,
    pub text: String,
}

/// A mock sender for testing.
///
/// Replies succeed with status 200 until [`fail_with`](Self::fail_with) is
/// called; every attempt is captured either way.
pub struct MockSender {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failure: Arc<Mutex<Option<(u16, String)>>>,
}

impl MockSender {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Reject all following sends with this HTTP status and body.
    pub async fn fail_with(&self, status: u16, detail: impl Into<String>) {
        *self.failure.lock().await = Some((status, detail.into()));
    }

    /// Accept sends again.
    pub async fn recover(&self) {
        *self.failure.lock().await = None;
    }

    /// Every attempted send, in order.
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Texts sent to one recipient, in order.
    pub async fn sent_to(&self, to: &str) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.to == to)
            .map(|m| m.text.clone())
            .collect()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

impl Default for MockSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockSender {
    fn name(&self) -> &str {
        "mock-sender"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, FolioError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FolioError> {
        Ok(())
    }
}

#[async_trait]
impl OutboundSender for MockSender {
    async fn send_text(&self, to: &str, text: &str) -> SendReceipt {
        self.sent.lock().await.push(SentMessage {
            to: to.to_string(),
            text: text.to_string(),
        });
        match self.failure.lock().await.clone() {
            Some((status, detail)) => SendReceipt::rejected(status, detail),
            None => SendReceipt::delivered(200, r#"{"messages":[{"id":"wamid.mock"}]}"#),
        }
    }
}
