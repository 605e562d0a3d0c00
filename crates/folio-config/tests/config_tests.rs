// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Folio configuration system.

use folio_config::diagnostic::ConfigError;
use folio_config::model::FolioConfig;
use folio_config::{
    load_and_validate_path, load_and_validate_str, load_config_from_str,
    validate_serve_requirements,
};
use folio_core::DedupPolicy;

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[intake]
name = "mesa-de-ayuda"
log_level = "debug"
dedup_policy = "reprocess"

[whatsapp]
access_token = "EAAG-token"
phone_number_id = "1234567890"
graph_version = "v20.0"
api_base_url = "http://localhost:9999"
verify_token = "handshake"
app_secret = "shh"
send_timeout_secs = 5

[storage]
database_path = "/tmp/folio-test.db"
wal_mode = false

[gateway]
host = "0.0.0.0"
port = 3000
webhook_path = "/hooks/whatsapp"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.intake.name, "mesa-de-ayuda");
    assert_eq!(config.intake.log_level, "debug");
    assert_eq!(config.intake.dedup_policy, DedupPolicy::Reprocess);
    assert_eq!(config.whatsapp.access_token.as_deref(), Some("EAAG-token"));
    assert_eq!(config.whatsapp.phone_number_id.as_deref(), Some("1234567890"));
    assert_eq!(config.whatsapp.graph_version, "v20.0");
    assert_eq!(config.whatsapp.api_base_url, "http://localhost:9999");
    assert_eq!(config.whatsapp.verify_token.as_deref(), Some("handshake"));
    assert_eq!(config.whatsapp.app_secret.as_deref(), Some("shh"));
    assert_eq!(config.whatsapp.send_timeout_secs, 5);
    assert_eq!(config.storage.database_path, "/tmp/folio-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.gateway.host, "0.0.0.0");
    assert_eq!(config.gateway.port, 3000);
    assert_eq!(config.gateway.webhook_path, "/hooks/whatsapp");
}

#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML is valid");
    assert_eq!(config.intake.name, "folio");
    assert_eq!(config.intake.dedup_policy, DedupPolicy::Skip);
    assert_eq!(config.whatsapp.api_base_url, "https://graph.facebook.com");
    assert_eq!(config.whatsapp.send_timeout_secs, 20);
    assert!(config.storage.wal_mode);
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 8080);
    assert_eq!(config.gateway.webhook_path, "/webhook");
}

#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telegram]
bot_token = "nope"
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn typo_in_whatsapp_section_suggests_fix() {
    let toml = r#"
[whatsapp]
acess_token = "EAAG"
"#;

    let errors = load_and_validate_str(toml).expect_err("typo should be rejected");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } if key == "acess_token" => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("access_token"));
}

#[test]
fn unknown_key_lists_valid_keys() {
    let toml = r#"
[gateway]
prot = 9000
"#;

    let errors = load_and_validate_str(toml).expect_err("unknown key should fail");
    let lists_keys = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { valid_keys, .. }
            if valid_keys.contains("host") && valid_keys.contains("webhook_path"))
    });
    assert!(lists_keys, "error should list the [gateway] keys: {errors:?}");
}

#[test]
fn inline_unknown_key_carries_source_span() {
    let toml = "[intake]\nnaem = \"x\"\n";

    let errors = load_and_validate_str(toml).expect_err("unknown key should fail");
    assert!(!errors.is_empty());
    // Inline sources have no file metadata, so the span is best-effort.
    assert!(matches!(&errors[0], ConfigError::UnknownKey { key, .. } if key == "naem"));
}

#[test]
fn wrong_type_for_port() {
    let toml = r#"
[gateway]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("string port should fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port"))),
        "got: {errors:?}"
    );
}

#[test]
fn validation_collects_every_error() {
    let toml = r#"
[gateway]
webhook_path = "/health"

[whatsapp]
send_timeout_secs = 0
graph_version = "21.0"
"#;

    let errors = load_and_validate_str(toml).expect_err("three problems expected");
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    assert_eq!(errors.len(), 3, "got: {messages:?}");
    assert!(messages.iter().any(|m| m.contains("webhook_path")));
    assert!(messages.iter().any(|m| m.contains("send_timeout_secs")));
    assert!(messages.iter().any(|m| m.contains("graph_version")));
}

#[test]
fn serve_requirements_name_missing_credentials() {
    let config = FolioConfig::default();
    let errors = validate_serve_requirements(&config).expect_err("no credentials");
    let keys: Vec<&str> = errors
        .iter()
        .filter_map(|e| match e {
            ConfigError::MissingKey { key } => Some(key.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            "whatsapp.access_token",
            "whatsapp.phone_number_id",
            "whatsapp.verify_token"
        ]
    );
}

#[test]
fn serve_requirements_pass_with_credentials() {
    let toml = r#"
[whatsapp]
access_token = "t"
phone_number_id = "p"
verify_token = "v"
"#;
    let config = load_and_validate_str(toml).expect("valid");
    assert!(validate_serve_requirements(&config).is_ok());
}

#[test]
fn explicit_path_is_loaded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[gateway]\nport = 4040\n").expect("write config");

    let config = load_and_validate_path(&path).expect("file should load");
    assert_eq!(config.gateway.port, 4040);
}

#[test]
fn explicit_path_must_exist() {
    let dir = tempfile::tempdir().expect("tempdir");
    let errors = load_and_validate_path(&dir.path().join("absent.toml"))
        .expect_err("missing file should fail");
    assert!(matches!(&errors[0], ConfigError::Other(msg) if msg.contains("absent.toml")));
}

#[test]
fn explicit_path_typo_points_into_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("folio.toml");
    std::fs::write(&path, "[storage]\ndatabse_path = \"x.db\"\n").expect("write config");

    let errors = load_and_validate_path(&path).expect_err("typo should fail");
    let span = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey { span, suggestion, .. } => {
            assert_eq!(suggestion.as_deref(), Some("database_path"));
            *span
        }
        _ => None,
    });
    let span = span.expect("file-backed error should carry a span");
    assert_eq!(span.offset(), "[storage]\n".len());
}

#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "prot".to_string(),
        suggestion: Some("port".to_string()),
        valid_keys: "host, port, webhook_path".to_string(),
        span: None,
        src: None,
    };
    let help = error.help().expect("help text").to_string();
    assert!(help.contains("did you mean `port`"));

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render");
    assert!(buf.contains("prot"));
}
