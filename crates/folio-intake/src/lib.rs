// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine and ingestion pipeline for the Folio intake service.
//!
//! [`engine`] decides each turn from `(state, normalized text)` without
//! touching storage. [`pipeline`] wraps it with dedup, the session and
//! ticket stores, and the outbound reply.

pub mod engine;
pub mod normalize;
pub mod pipeline;
pub mod replies;
pub mod shutdown;

pub use engine::{Effect, Reply, Transition, transition};
pub use normalize::normalize;
pub use pipeline::{BatchReport, IngestionPipeline, MessageOutcome, TurnSummary};
pub use shutdown::install_signal_handler;
