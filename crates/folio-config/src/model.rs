// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Folio intake service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use folio_core::DedupPolicy;
use serde::{Deserialize, Serialize};

/// Top-level Folio configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FolioConfig {
    /// Intake pipeline behavior.
    #[serde(default)]
    pub intake: IntakeConfig,

    /// WhatsApp Cloud API credentials and webhook settings.
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Webhook HTTP server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Intake pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IntakeConfig {
    /// Service name used in logs and the doctor report.
    #[serde(default = "default_intake_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Handling of redelivered message ids (`skip` or `reprocess`).
    #[serde(default)]
    pub dedup_policy: DedupPolicy,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            name: default_intake_name(),
            log_level: default_log_level(),
            dedup_policy: DedupPolicy::default(),
        }
    }
}

fn default_intake_name() -> String {
    "folio".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// WhatsApp Cloud API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    /// Graph API bearer token. Required by `folio serve`.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Phone number id replies are sent from. Required by `folio serve`.
    #[serde(default)]
    pub phone_number_id: Option<String>,

    /// Graph API version segment, e.g. `v21.0`.
    #[serde(default = "default_graph_version")]
    pub graph_version: String,

    /// Graph API base URL (overridable for tests and proxies).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Token the platform echoes during the webhook subscription handshake.
    #[serde(default)]
    pub verify_token: Option<String>,

    /// App secret used to verify `X-Hub-Signature-256`. `None` disables the check.
    #[serde(default)]
    pub app_secret: Option<String>,

    /// Timeout for a single outbound send attempt, in seconds.
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            phone_number_id: None,
            graph_version: default_graph_version(),
            api_base_url: default_api_base_url(),
            verify_token: None,
            app_secret: None,
            send_timeout_secs: default_send_timeout_secs(),
        }
    }
}

fn default_graph_version() -> String {
    "v21.0".to_string()
}

fn default_api_base_url() -> String {
    "https://graph.facebook.com".to_string()
}

fn default_send_timeout_secs() -> u64 {
    20
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("folio").join("folio.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("folio.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Webhook HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the server to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Route the platform delivers webhooks to.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            webhook_path: default_webhook_path(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_webhook_path() -> String {
    "/webhook".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whatsapp_defaults() {
        let wa = WhatsAppConfig::default();
        assert!(wa.access_token.is_none());
        assert!(wa.app_secret.is_none());
        assert_eq!(wa.graph_version, "v21.0");
        assert_eq!(wa.send_timeout_secs, 20);
    }

    #[test]
    fn dedup_policy_deserializes_lowercase() {
        let config: FolioConfig = toml::from_str(
            r#"
[intake]
dedup_policy = "reprocess"
"#,
        )
        .unwrap();
        assert_eq!(config.intake.dedup_policy, DedupPolicy::Reprocess);
    }

    #[test]
    fn unknown_dedup_policy_is_rejected() {
        let result = toml::from_str::<FolioConfig>(
            r#"
[intake]
dedup_policy = "sometimes"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn gateway_deny_unknown_fields() {
        let result = toml::from_str::<FolioConfig>(
            r#"
[gateway]
prot = 9000
"#,
        );
        assert!(result.is_err());
    }
}
