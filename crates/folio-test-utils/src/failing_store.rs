// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket store that always fails, for exercising per-message error isolation.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use folio_core::{FolioError, TicketCategory, TicketStore};

/// Every call returns [`FolioError::Storage`] and bumps a call counter.
#[derive(Debug, Default)]
pub struct FailingTicketStore {
    calls: AtomicUsize,
}

impl FailingTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times either operation was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self, op: &str) -> FolioError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        FolioError::storage(std::io::Error::other(format!("ticket store unavailable ({op})")))
    }
}

#[async_trait]
impl TicketStore for FailingTicketStore {
    async fn open(&self, _user_id: &str, _category: TicketCategory) -> Result<i64, FolioError> {
        Err(self.fail("open"))
    }

    async fn attach_details(
        &self,
        _user_id: &str,
        _details: &str,
    ) -> Result<Option<i64>, FolioError> {
        Err(self.fail("attach_details"))
    }
}
