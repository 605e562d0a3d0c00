// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Support tickets.

use folio_core::{FolioError, TicketCategory, TicketStatus};
use rusqlite::{OptionalExtension, params};

use crate::database::Database;
use crate::models::{Ticket, TicketFilter};
use crate::queries::parse_column;

const TICKET_COLUMNS: &str = "id, user_id, category, details, status, created_at, updated_at";

fn ticket_from_row(row: &rusqlite::Row<'_>) -> Result<Ticket, rusqlite::Error> {
    Ok(Ticket {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: parse_column(2, row.get(2)?)?,
        details: row.get(3)?,
        status: parse_column(4, row.get(4)?)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Open a ticket with no details and return its id.
pub async fn open_ticket(
    db: &Database,
    user_id: &str,
    category: TicketCategory,
) -> Result<i64, FolioError> {
    let user_id = user_id.to_string();
    let category = category.to_string();
    let status = TicketStatus::Open.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "INSERT INTO tickets (user_id, category, status) VALUES (?1, ?2, ?3)
                 RETURNING id",
                params![user_id, category, status],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fill in the details of the user's most recently created open ticket.
///
/// Only a ticket whose details are still empty is updated, so a ticket
/// receives details at most once. Returns the updated ticket id, or `None`
/// when the latest open ticket is missing or already has details.
pub async fn attach_details(
    db: &Database,
    user_id: &str,
    details: &str,
) -> Result<Option<i64>, FolioError> {
    let user_id = user_id.to_string();
    let details = details.to_string();
    let open = TicketStatus::Open.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "UPDATE tickets
                 SET details = ?2, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = (
                     SELECT id FROM tickets
                     WHERE user_id = ?1 AND status = ?3
                     ORDER BY created_at DESC, id DESC
                     LIMIT 1
                 )
                 AND details IS NULL
                 RETURNING id",
                params![user_id, details, open],
                |row| row.get(0),
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a ticket by id.
pub async fn get_ticket(db: &Database, id: i64) -> Result<Option<Ticket>, FolioError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?1"),
                params![id],
                ticket_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List tickets newest first.
pub async fn list_tickets(db: &Database, filter: &TicketFilter) -> Result<Vec<Ticket>, FolioError> {
    let user_id = filter.user_id.clone();
    let status = filter.status.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TICKET_COLUMNS} FROM tickets
                 WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR status = ?2)
                 ORDER BY id DESC"
            ))?;
            let rows = stmt.query_map(params![user_id, status], ticket_from_row)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark an open ticket closed. Returns `false` if the ticket does not exist
/// or is already closed.
pub async fn close_ticket(db: &Database, id: i64) -> Result<bool, FolioError> {
    let open = TicketStatus::Open.to_string();
    let closed = TicketStatus::Closed.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE tickets
                 SET status = ?2, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1 AND status = ?3",
                params![id, closed, open],
            )?;
            Ok(changed == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
