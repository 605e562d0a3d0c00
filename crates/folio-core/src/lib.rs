// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Folio intake service.
//!
//! This crate provides the error type, the domain types (sessions, inbound
//! message records, tickets, conversation states) and the adapter traits that
//! the storage backend and messaging channel implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::FolioError;
pub use types::{
    AdapterType, ConversationState, DedupPolicy, HealthStatus, TicketCategory, TicketStatus,
};

pub use traits::{
    MessageStore, OutboundSender, PluginAdapter, SessionStore, StorageAdapter, TicketStore,
};
