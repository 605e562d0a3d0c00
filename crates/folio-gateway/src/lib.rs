// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP entry point for WhatsApp webhook deliveries.
//!
//! The gateway answers the platform's subscription handshake, checks
//! delivery signatures, hands parsed messages to the
//! [`IngestionPipeline`](folio_intake::IngestionPipeline), and exposes
//! `/health` and `/metrics` for operators.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, HealthState, ServerConfig, WebhookAuth, build_router, start_server};
