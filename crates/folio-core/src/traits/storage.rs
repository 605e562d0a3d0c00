// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage traits: backend lifecycle plus the three stores the intake
//! pipeline depends on.

use async_trait::async_trait;

use crate::error::FolioError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ConversationState, InboundMessage, RecordOutcome, Session, TicketCategory};

/// Lifecycle of a persistence backend.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (connection, migrations).
    async fn initialize(&self) -> Result<(), FolioError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), FolioError>;
}

/// Records inbound messages by platform id; enforces at-most-once processing.
#[async_trait]
pub trait MessageStore: Send + Sync + 'static {
    /// Insert the message unless its id already exists.
    ///
    /// An existing id yields [`RecordOutcome::Duplicate`], never an error.
    async fn record(&self, message: &InboundMessage) -> Result<RecordOutcome, FolioError>;
}

/// Maps user identifiers to their conversation state.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Return the user's session, creating it in [`ConversationState::Initial`]
    /// if it does not exist. Concurrent calls never create two sessions.
    async fn get_or_create(&self, user_id: &str) -> Result<Session, FolioError>;

    /// Update the state and last-seen timestamp. A missing user is a no-op.
    async fn set_state(&self, user_id: &str, state: ConversationState) -> Result<(), FolioError>;
}

/// Creates and updates support tickets.
#[async_trait]
pub trait TicketStore: Send + Sync + 'static {
    /// Open a new ticket and return its id.
    async fn open(&self, user_id: &str, category: TicketCategory) -> Result<i64, FolioError>;

    /// Attach details to the user's most recently created open ticket.
    ///
    /// Returns `None` when there is no open ticket that can take details.
    async fn attach_details(&self, user_id: &str, details: &str)
    -> Result<Option<i64>, FolioError>;
}
