// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Cloud API channel for the Folio intake service.
//!
//! Covers both directions of the channel: the inbound webhook payload model
//! with signature verification, and [`WhatsAppSender`], the outbound
//! implementation of [`folio_core::OutboundSender`].

pub mod client;
pub mod signature;
pub mod types;

pub use client::WhatsAppSender;
pub use signature::{SIGNATURE_HEADER, sign, verify_signature};
pub use types::WebhookPayload;

/// Parse a raw webhook body into the messages it carries.
///
/// Returns `Err` only when the body is not JSON at all.
pub fn parse_webhook(
    body: &[u8],
) -> Result<Vec<folio_core::types::InboundMessage>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    Ok(WebhookPayload::from_value(value).messages())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_webhook_distinguishes_invalid_json() {
        assert!(parse_webhook(b"{not json").is_err());
        assert!(parse_webhook(b"{}").unwrap().is_empty());

        let body = br#"{"entry":[{"changes":[{"value":{"messages":[
            {"id":"m1","from":"u1","type":"text","text":{"body":"hola"}}
        ]}}]}]}"#;
        let messages = parse_webhook(body).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "hola");
    }
}
