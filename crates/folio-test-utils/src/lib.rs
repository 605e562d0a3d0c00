// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Folio integration tests.
//!
//! Provides mock adapters and a temp-database fixture for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockSender`] - Outbound sender that captures replies and can be told to fail
//! - [`FailingTicketStore`] - Ticket store whose every call errors
//! - [`TestStorage`] - Migrated [`SqliteStorage`](folio_storage::SqliteStorage) in a temp dir
//! - [`TestHarness`] - Full ingestion pipeline over a [`TestStorage`] and a [`MockSender`]

pub mod failing_store;
pub mod harness;
pub mod mock_sender;

pub use failing_store::FailingTicketStore;
pub use harness::{TestHarness, TestHarnessBuilder, TestStorage};
pub use mock_sender::{MockSender, SentMessage};
