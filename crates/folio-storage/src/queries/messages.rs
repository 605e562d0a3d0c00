// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message log.

use folio_core::FolioError;
use folio_core::types::InboundMessage;
use rusqlite::params;

use crate::database::Database;
use crate::models::{MessageRecord, RecordOutcome};

/// Record a message by platform id. A repeated id leaves the table untouched
/// and reports [`RecordOutcome::Duplicate`].
pub async fn record_message(
    db: &Database,
    msg: &InboundMessage,
) -> Result<RecordOutcome, FolioError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "INSERT INTO inbound_messages (message_id, sender, msg_type, body)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(message_id) DO NOTHING",
                params![msg.id, msg.sender, msg.msg_type, msg.body],
            )?;
            Ok(if changed == 1 {
                RecordOutcome::Inserted
            } else {
                RecordOutcome::Duplicate
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look up a recorded message.
pub async fn get_message(db: &Database, id: &str) -> Result<Option<MessageRecord>, FolioError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT message_id, sender, msg_type, body, received_at
                 FROM inbound_messages WHERE message_id = ?1",
                params![id],
                |row| {
                    Ok(MessageRecord {
                        message_id: row.get(0)?,
                        sender: row.get(1)?,
                        msg_type: row.get(2)?,
                        body: row.get(3)?,
                        received_at: row.get(4)?,
                    })
                },
            );
            match result {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count recorded messages, optionally for a single sender.
pub async fn count_messages(db: &Database, sender: Option<&str>) -> Result<i64, FolioError> {
    let sender = sender.map(str::to_string);
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM inbound_messages WHERE ?1 IS NULL OR sender = ?1",
                params![sender],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn first_record_inserts_second_is_duplicate() {
        let (db, _dir) = setup_db().await;
        let msg = InboundMessage::text("wamid.1", "5215550001", "hola");

        let first = record_message(&db, &msg).await.unwrap();
        let second = record_message(&db, &msg).await.unwrap();
        assert_eq!(first, RecordOutcome::Inserted);
        assert_eq!(second, RecordOutcome::Duplicate);
        assert_eq!(count_messages(&db, None).await.unwrap(), 1);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_keeps_original_body() {
        let (db, _dir) = setup_db().await;
        record_message(&db, &InboundMessage::text("wamid.2", "u1", "first"))
            .await
            .unwrap();
        record_message(&db, &InboundMessage::text("wamid.2", "u1", "second"))
            .await
            .unwrap();

        let stored = get_message(&db, "wamid.2").await.unwrap().unwrap();
        assert_eq!(stored.body.as_deref(), Some("first"));
        assert_eq!(stored.msg_type, "text");
        assert!(stored.received_at.ends_with('Z'));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn non_text_message_stores_placeholder() {
        let (db, _dir) = setup_db().await;
        record_message(&db, &InboundMessage::non_text("wamid.3", "u1", "image"))
            .await
            .unwrap();

        let stored = get_message(&db, "wamid.3").await.unwrap().unwrap();
        assert_eq!(stored.msg_type, "image");
        assert_eq!(stored.body.as_deref(), Some("[tipo: image]"));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn count_filters_by_sender() {
        let (db, _dir) = setup_db().await;
        for (id, sender) in [("a", "u1"), ("b", "u1"), ("c", "u2")] {
            record_message(&db, &InboundMessage::text(id, sender, "x"))
                .await
                .unwrap();
        }
        assert_eq!(count_messages(&db, Some("u1")).await.unwrap(), 2);
        assert_eq!(count_messages(&db, Some("u2")).await.unwrap(), 1);
        assert_eq!(count_messages(&db, Some("nobody")).await.unwrap(), 0);
        assert_eq!(count_messages(&db, None).await.unwrap(), 3);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn missing_message_is_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_message(&db, "nope").await.unwrap().is_none());
        db.close().await.unwrap();
    }
}
