// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command matching form of a message body.

/// Lowercase, trim, and collapse every whitespace run to a single space.
///
/// Only used for matching options and reset keywords; the stored body and
/// ticket details keep the raw text.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
