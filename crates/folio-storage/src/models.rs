// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for storage entities.
//!
//! The canonical types live in `folio-core::types` so they can cross adapter
//! trait boundaries; they are re-exported here for the query modules.

pub use folio_core::types::{MessageRecord, RecordOutcome, Session, Ticket};

/// Filter for operator ticket listings. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub user_id: Option<String>,
    pub status: Option<folio_core::TicketStatus>,
}
