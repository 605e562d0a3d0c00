// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end conversation testing.
//!
//! `TestStorage` owns a migrated SQLite database in a temporary directory
//! that is removed when the fixture is dropped. `TestHarness` wires an
//! [`IngestionPipeline`] over it with a [`MockSender`], and offers helpers to
//! drive a conversation one message at a time.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use folio_config::model::StorageConfig;
use folio_core::types::InboundMessage;
use folio_core::{ConversationState, DedupPolicy, FolioError, StorageAdapter, TicketStore};
use folio_intake::{IngestionPipeline, MessageOutcome};
use folio_storage::SqliteStorage;

use crate::mock_sender::MockSender;

/// A migrated [`SqliteStorage`] backed by a temp file.
pub struct TestStorage {
    pub storage: Arc<SqliteStorage>,
    pub db_path: PathBuf,
    _temp_dir: tempfile::TempDir,
}

impl TestStorage {
    /// Create the temp directory, open the database and run migrations.
    pub async fn new() -> Result<Self, FolioError> {
        let temp_dir = tempfile::TempDir::new().map_err(FolioError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        });
        storage.initialize().await?;
        tracing::debug!(path = %db_path.display(), "test storage ready");

        Ok(Self {
            storage: Arc::new(storage),
            db_path,
            _temp_dir: temp_dir,
        })
    }
}

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    dedup: DedupPolicy,
    tickets: Option<Arc<dyn TicketStore>>,
    sender: Option<Arc<MockSender>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            dedup: DedupPolicy::default(),
            tickets: None,
            sender: None,
        }
    }

    pub fn with_dedup_policy(mut self, dedup: DedupPolicy) -> Self {
        self.dedup = dedup;
        self
    }

    /// Replace the SQLite ticket store, e.g. with a
    /// [`FailingTicketStore`](crate::FailingTicketStore).
    pub fn with_ticket_store(mut self, tickets: Arc<dyn TicketStore>) -> Self {
        self.tickets = Some(tickets);
        self
    }

    pub fn with_sender(mut self, sender: Arc<MockSender>) -> Self {
        self.sender = Some(sender);
        self
    }

    pub async fn build(self) -> Result<TestHarness, FolioError> {
        let db = TestStorage::new().await?;
        let storage = db.storage.clone();
        let sender = self.sender.unwrap_or_default();
        let tickets: Arc<dyn TicketStore> = match self.tickets {
            Some(tickets) => tickets,
            None => storage.clone(),
        };

        let pipeline = IngestionPipeline::new(
            storage.clone(),
            storage.clone(),
            tickets,
            sender.clone(),
        )
        .with_dedup_policy(self.dedup);

        Ok(TestHarness {
            pipeline,
            sender,
            storage,
            next_id: AtomicU64::new(1),
            _db: db,
        })
    }
}

/// A complete intake stack with temp storage and a mock sender.
pub struct TestHarness {
    pub pipeline: IngestionPipeline,
    pub sender: Arc<MockSender>,
    pub storage: Arc<SqliteStorage>,
    next_id: AtomicU64,
    _db: TestStorage,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Fresh message id, unique within this harness.
    pub fn next_message_id(&self) -> String {
        format!("wamid.test{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Deliver one text message with a fresh id.
    pub async fn say(&self, user_id: &str, text: &str) -> MessageOutcome {
        let message = InboundMessage::text(self.next_message_id(), user_id, text);
        self.pipeline.process_message(&message).await
    }

    /// Last reply sent to `user_id`, if any.
    pub async fn last_reply(&self, user_id: &str) -> Option<String> {
        self.sender.sent_to(user_id).await.pop()
    }

    /// Committed state for `user_id`; `INITIAL` for users never seen.
    pub async fn state(&self, user_id: &str) -> Result<ConversationState, FolioError> {
        Ok(self
            .storage
            .get_session(user_id)
            .await?
            .map(|s| s.state)
            .unwrap_or_default())
    }
}
