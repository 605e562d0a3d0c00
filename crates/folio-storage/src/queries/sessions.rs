// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation sessions.

use folio_core::{ConversationState, FolioError};
use rusqlite::{OptionalExtension, params};

use crate::database::Database;
use crate::models::Session;

const SESSION_COLUMNS: &str = "user_id, state, last_seen, created_at";

/// Raw row. The state column is parsed outside the writer thread so that
/// corrupt values are logged in the caller's span.
struct SessionRow {
    user_id: String,
    state: String,
    last_seen: Option<String>,
    created_at: String,
}

impl SessionRow {
    fn from_row(row: &rusqlite::Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            user_id: row.get(0)?,
            state: row.get(1)?,
            last_seen: row.get(2)?,
            created_at: row.get(3)?,
        })
    }

    fn into_session(self) -> Session {
        Session {
            state: ConversationState::from_stored(&self.state),
            user_id: self.user_id,
            last_seen: self.last_seen,
            created_at: self.created_at,
        }
    }
}

/// Fetch the user's session, creating it in `INITIAL` when absent.
///
/// Insert and select run in one writer closure, so two concurrent first
/// messages from the same user still produce a single row.
pub async fn get_or_create_session(db: &Database, user_id: &str) -> Result<Session, FolioError> {
    let user_id = user_id.to_string();
    let initial = ConversationState::Initial.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (user_id, state) VALUES (?1, ?2)
                 ON CONFLICT(user_id) DO NOTHING",
                params![user_id, initial],
            )?;
            conn.query_row(
                &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE user_id = ?1"),
                params![user_id],
                SessionRow::from_row,
            )
        })
        .await
        .map(SessionRow::into_session)
        .map_err(crate::database::map_tr_err)
}

/// Get a session without creating it.
pub async fn get_session(db: &Database, user_id: &str) -> Result<Option<Session>, FolioError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE user_id = ?1"),
                params![user_id],
                SessionRow::from_row,
            )
            .optional()
        })
        .await
        .map(|row| row.map(SessionRow::into_session))
        .map_err(crate::database::map_tr_err)
}

/// List sessions, most recently active first, optionally filtered by state.
pub async fn list_sessions(
    db: &Database,
    state: Option<ConversationState>,
) -> Result<Vec<Session>, FolioError> {
    let state = state.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions
                 WHERE ?1 IS NULL OR state = ?1
                 ORDER BY COALESCE(last_seen, created_at) DESC, user_id"
            ))?;
            let rows = stmt.query_map(params![state], SessionRow::from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map(|rows| rows.into_iter().map(SessionRow::into_session).collect())
        .map_err(crate::database::map_tr_err)
}

/// Store a new state and bump `last_seen`. Returns the number of rows
/// changed: 0 when the user has no session.
pub async fn set_session_state(
    db: &Database,
    user_id: &str,
    state: ConversationState,
) -> Result<usize, FolioError> {
    let user_id = user_id.to_string();
    let state = state.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE sessions
                 SET state = ?1, last_seen = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE user_id = ?2",
                params![state, user_id],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}
