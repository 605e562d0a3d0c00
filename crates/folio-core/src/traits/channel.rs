// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound channel trait for delivering replies through a messaging platform.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;
use crate::types::SendReceipt;

/// Delivers plain-text replies to a user.
///
/// Implementations make exactly one attempt with a bounded timeout and report
/// the outcome in the receipt instead of failing; callers log and continue.
#[async_trait]
pub trait OutboundSender: PluginAdapter {
    async fn send_text(&self, to: &str, text: &str) -> SendReceipt;
}
