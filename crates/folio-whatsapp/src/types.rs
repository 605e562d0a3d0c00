// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cloud API webhook payload model and message extraction.
//!
//! Only the fields the intake flow reads are modelled. Every collection
//! defaults to empty so partial or status-only notifications deserialize.
//! Messages are kept as raw JSON until extraction, so a malformed message
//! is dropped on its own and never takes its siblings with it.

use folio_core::types::{InboundMessage, TEXT_MESSAGE_TYPE};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// Message type recorded when the platform omits `type`.
pub const UNKNOWN_MESSAGE_TYPE: &str = "unknown";

/// Top-level webhook notification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: ChangeValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub messages: Vec<Value>,
}

/// Receiving business number.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    #[serde(default, deserialize_with = "string_or_number")]
    pub display_phone_number: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub phone_number_id: Option<String>,
}

/// One user message as delivered by the platform.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookMessage {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub timestamp: Option<String>,
    #[serde(default, rename = "type")]
    pub message_type: Option<String>,
    #[serde(default)]
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub body: Option<String>,
}

/// Identifier fields arrive as strings, but phone numbers are sometimes
/// numeric. Any other JSON type reads as absent.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

impl WebhookPayload {
    /// Interpret an already-parsed JSON document.
    ///
    /// Valid JSON in an unexpected shape carries no messages rather than
    /// being an error.
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            debug!(error = %e, "webhook body has no recognizable message structure");
            Self::default()
        })
    }

    /// Every well-formed message across all entries and changes, in
    /// delivery order.
    pub fn messages(&self) -> Vec<InboundMessage> {
        self.entry
            .iter()
            .flat_map(|entry| &entry.changes)
            .flat_map(|change| &change.value.messages)
            .filter_map(WebhookMessage::from_raw)
            .filter_map(|message| message.to_inbound())
            .collect()
    }
}

impl WebhookMessage {
    /// Read one raw message; `None` when it does not have the expected shape.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        match Self::deserialize(raw) {
            Ok(message) => Some(message),
            Err(e) => {
                debug!(error = %e, "skipping malformed webhook message");
                None
            }
        }
    }

    /// Convert to the platform-neutral form. Messages without an id or
    /// sender are dropped.
    pub fn to_inbound(&self) -> Option<InboundMessage> {
        let (Some(id), Some(from)) = (self.id.as_deref(), self.from.as_deref()) else {
            debug!(
                id = ?self.id,
                from = ?self.from,
                "skipping webhook message without id or sender"
            );
            return None;
        };

        let msg_type = self.message_type.as_deref().unwrap_or(UNKNOWN_MESSAGE_TYPE);
        let mut inbound = if msg_type == TEXT_MESSAGE_TYPE {
            let body = self
                .text
                .as_ref()
                .and_then(|t| t.body.as_deref())
                .unwrap_or_default();
            InboundMessage::text(id, from, body)
        } else {
            InboundMessage::non_text(id, from, msg_type)
        };
        inbound.timestamp = self.timestamp.clone();
        Some(inbound)
    }
}
