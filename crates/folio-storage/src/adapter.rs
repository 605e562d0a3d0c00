// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use folio_config::model::StorageConfig;
use folio_core::types::InboundMessage;
use folio_core::{
    AdapterType, ConversationState, FolioError, HealthStatus, MessageStore, PluginAdapter,
    SessionStore, StorageAdapter, TicketCategory, TicketStore,
};

use crate::database::Database;
use crate::models::{MessageRecord, RecordOutcome, Session, Ticket, TicketFilter};
use crate::queries;

/// SQLite-backed message, session and ticket store.
///
/// The database is opened on the first call to [`StorageAdapter::initialize`];
/// every other operation fails until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, FolioError> {
        self.db.get().ok_or_else(|| FolioError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    pub async fn get_session(&self, user_id: &str) -> Result<Option<Session>, FolioError> {
        queries::sessions::get_session(self.db()?, user_id).await
    }

    pub async fn list_sessions(
        &self,
        state: Option<ConversationState>,
    ) -> Result<Vec<Session>, FolioError> {
        queries::sessions::list_sessions(self.db()?, state).await
    }

    pub async fn get_message(&self, id: &str) -> Result<Option<MessageRecord>, FolioError> {
        queries::messages::get_message(self.db()?, id).await
    }

    pub async fn count_messages(&self, sender: Option<&str>) -> Result<i64, FolioError> {
        queries::messages::count_messages(self.db()?, sender).await
    }

    pub async fn get_ticket(&self, id: i64) -> Result<Option<Ticket>, FolioError> {
        queries::tickets::get_ticket(self.db()?, id).await
    }

    pub async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, FolioError> {
        queries::tickets::list_tickets(self.db()?, filter).await
    }

    /// Operator action; the intake flow never closes tickets.
    pub async fn close_ticket(&self, id: i64) -> Result<bool, FolioError> {
        queries::tickets::close_ticket(self.db()?, id).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, FolioError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT 1", [], |row| row.get(0))
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FolioError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), FolioError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| FolioError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), FolioError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl MessageStore for SqliteStorage {
    async fn record(&self, message: &InboundMessage) -> Result<RecordOutcome, FolioError> {
        queries::messages::record_message(self.db()?, message).await
    }
}

#[async_trait]
impl SessionStore for SqliteStorage {
    async fn get_or_create(&self, user_id: &str) -> Result<Session, FolioError> {
        queries::sessions::get_or_create_session(self.db()?, user_id).await
    }

    async fn set_state(&self, user_id: &str, state: ConversationState) -> Result<(), FolioError> {
        let changed = queries::sessions::set_session_state(self.db()?, user_id, state).await?;
        if changed == 0 {
            warn!(user_id, %state, "set_state for unknown user ignored");
        }
        Ok(())
    }
}

#[async_trait]
impl TicketStore for SqliteStorage {
    async fn open(&self, user_id: &str, category: TicketCategory) -> Result<i64, FolioError> {
        queries::tickets::open_ticket(self.db()?, user_id, category).await
    }

    async fn attach_details(
        &self,
        user_id: &str,
        details: &str,
    ) -> Result<Option<i64>, FolioError> {
        queries::tickets::attach_details(self.db()?, user_id, details).await
    }
}
