// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as bind addresses, route paths and timeout bounds.

use crate::diagnostic::ConfigError;
use crate::model::FolioConfig;

/// Upper bound for a single outbound send attempt.
pub const MAX_SEND_TIMEOUT_SECS: u64 = 120;

/// Routes the gateway serves itself; the webhook cannot shadow them.
const RESERVED_PATHS: [&str; 2] = ["/health", "/metrics"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &FolioConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(validation("gateway.host must not be empty".to_string()));
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(validation(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            )));
        }
    }

    let path = &config.gateway.webhook_path;
    if !path.starts_with('/') {
        errors.push(validation(format!(
            "gateway.webhook_path must start with `/`, got `{path}`"
        )));
    } else if RESERVED_PATHS.contains(&path.as_str()) {
        errors.push(validation(format!(
            "gateway.webhook_path `{path}` collides with a built-in route"
        )));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(validation(
            "storage.database_path must not be empty".to_string(),
        ));
    }

    let timeout = config.whatsapp.send_timeout_secs;
    if timeout == 0 || timeout > MAX_SEND_TIMEOUT_SECS {
        errors.push(validation(format!(
            "whatsapp.send_timeout_secs must be between 1 and {MAX_SEND_TIMEOUT_SECS}, got {timeout}"
        )));
    }

    if !config.whatsapp.graph_version.starts_with('v') {
        errors.push(validation(format!(
            "whatsapp.graph_version must look like `v21.0`, got `{}`",
            config.whatsapp.graph_version
        )));
    }

    let base = &config.whatsapp.api_base_url;
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        errors.push(validation(format!(
            "whatsapp.api_base_url must be an http(s) URL, got `{base}`"
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check the credentials `folio serve` cannot run without.
///
/// Kept separate from [`validate_config`] so `doctor` and `tickets` work on a
/// machine that has no WhatsApp credentials.
pub fn validate_serve_requirements(config: &FolioConfig) -> Result<(), Vec<ConfigError>> {
    let wa = &config.whatsapp;
    let required = [
        ("access_token", &wa.access_token),
        ("phone_number_id", &wa.phone_number_id),
        ("verify_token", &wa.verify_token),
    ];

    let errors: Vec<ConfigError> = required
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(key, _)| ConfigError::MissingKey {
            key: format!("whatsapp.{key}"),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validation(message: String) -> ConfigError {
    ConfigError::Validation { message }
}
