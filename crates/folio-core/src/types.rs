// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter traits and the intake pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

/// Message type reported by the platform for plain text messages.
pub const TEXT_MESSAGE_TYPE: &str = "text";

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`PluginAdapter`](crate::PluginAdapter).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
    Observability,
}

/// The step a user is currently at in the scripted intake dialogue.
///
/// Persisted as its uppercase name. `MENU` is accepted as a legacy alias
/// for [`ConversationState::Initial`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum ConversationState {
    #[default]
    #[strum(to_string = "INITIAL", serialize = "MENU")]
    #[serde(rename = "INITIAL", alias = "MENU")]
    Initial,
    #[strum(to_string = "AWAIT_OPTION")]
    #[serde(rename = "AWAIT_OPTION")]
    AwaitOption,
    #[strum(to_string = "AWAIT_DETAILS")]
    #[serde(rename = "AWAIT_DETAILS")]
    AwaitDetails,
}

impl ConversationState {
    /// Parse a state value read back from storage.
    ///
    /// Unrecognized values are a data-integrity problem: they are logged and
    /// mapped to [`ConversationState::Initial`] so the user sees the menu again.
    pub fn from_stored(raw: &str) -> Self {
        match raw.parse() {
            Ok(state) => state,
            Err(_) => {
                warn!(stored = raw, "unrecognized conversation state, falling back to INITIAL");
                ConversationState::Initial
            }
        }
    }
}

/// Category of a support request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum TicketCategory {
    /// Technical support (PCs, networks).
    #[strum(to_string = "SOPORTE")]
    #[serde(rename = "SOPORTE")]
    Support,
    /// Cybersecurity incidents (compromised accounts, phishing).
    #[strum(to_string = "CIBERSEGURIDAD")]
    #[serde(rename = "CIBERSEGURIDAD")]
    Security,
    /// CCTV, alarms and access control.
    #[strum(to_string = "CCTV_ALARMAS")]
    #[serde(rename = "CCTV_ALARMAS")]
    Surveillance,
    #[strum(to_string = "OTRO")]
    #[serde(rename = "OTRO")]
    Other,
}

/// Lifecycle status of a ticket. The intake core only ever produces `Open`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketStatus {
    #[default]
    Open,
    Closed,
}

/// What the ingestion pipeline does with a message id it has already recorded.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DedupPolicy {
    /// Skip the conversation turn entirely: no state change, no ticket, no reply.
    #[default]
    Skip,
    /// Run the conversation turn again on every delivery.
    Reprocess,
}

/// A single user message extracted from an inbound notification batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Platform-assigned message id; the idempotency key.
    pub id: String,
    /// Platform-scoped sender identifier.
    pub sender: String,
    /// Platform message type (`text`, `image`, `audio`, ...).
    pub msg_type: String,
    /// Text body, or a placeholder embedding the type for non-text messages.
    pub body: String,
    /// Platform timestamp as delivered, if any.
    pub timestamp: Option<String>,
}

impl InboundMessage {
    /// Build a text message.
    pub fn text(id: impl Into<String>, sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            msg_type: TEXT_MESSAGE_TYPE.to_string(),
            body: body.into(),
            timestamp: None,
        }
    }

    /// Build a non-text message whose body is the type placeholder.
    pub fn non_text(
        id: impl Into<String>,
        sender: impl Into<String>,
        msg_type: impl Into<String>,
    ) -> Self {
        let msg_type = msg_type.into();
        Self {
            id: id.into(),
            sender: sender.into(),
            body: placeholder_body(&msg_type),
            msg_type,
            timestamp: None,
        }
    }

    /// A message can only be processed when it carries both an id and a sender.
    pub fn is_complete(&self) -> bool {
        !self.id.trim().is_empty() && !self.sender.trim().is_empty()
    }
}

/// Placeholder body stored and evaluated for non-text messages.
pub fn placeholder_body(msg_type: &str) -> String {
    format!("[tipo: {msg_type}]")
}

/// A user's conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub state: ConversationState,
    pub last_seen: Option<String>,
    pub created_at: String,
}

/// A persisted inbound message, kept for dedup and audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub message_id: String,
    pub sender: String,
    pub msg_type: String,
    pub body: Option<String>,
    pub received_at: String,
}

/// A support request opened through the intake dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub user_id: String,
    pub category: TicketCategory,
    pub details: Option<String>,
    pub status: TicketStatus,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Result of recording an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// First time this message id was seen.
    Inserted,
    /// The id already existed; nothing was written.
    Duplicate,
}

impl RecordOutcome {
    pub fn inserted(self) -> bool {
        matches!(self, RecordOutcome::Inserted)
    }
}

/// Outcome of a single outbound send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// `true` only for a 2xx response.
    pub ok: bool,
    /// HTTP status, `None` when the request never got a response.
    pub status: Option<u16>,
    /// Response body or transport error text, for diagnostics.
    pub detail: String,
}

impl SendReceipt {
    pub fn delivered(status: u16, detail: impl Into<String>) -> Self {
        Self {
            ok: true,
            status: Some(status),
            detail: detail.into(),
        }
    }

    pub fn rejected(status: u16, detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: Some(status),
            detail: detail.into(),
        }
    }

    pub fn transport_failure(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: None,
            detail: detail.into(),
        }
    }
}
