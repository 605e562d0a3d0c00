// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `folio doctor` command implementation.
//!
//! Runs diagnostic checks against the configured database and WhatsApp
//! credentials and prints one line per check.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use folio_config::{ConfigError, FolioConfig};
use folio_core::types::HealthStatus;
use folio_core::{FolioError, PluginAdapter, StorageAdapter};
use folio_storage::{SqliteStorage, TicketFilter};
use folio_whatsapp::WhatsAppSender;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `folio doctor` command.
///
/// Configuration was already loaded and validated by the caller, so the
/// config check only reports what was loaded.
pub async fn run_doctor(config: &FolioConfig, plain: bool) -> Result<(), FolioError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        CheckResult::new(
            "Configuration",
            CheckStatus::Pass,
            format!(
                "valid (dedup_policy={}, listen={}:{}{})",
                config.intake.dedup_policy,
                config.gateway.host,
                config.gateway.port,
                config.gateway.webhook_path
            ),
            Instant::now(),
        ),
        check_database(config).await,
        check_credentials(config),
        check_signature(config),
        check_graph_api(config).await,
    ];

    println!();
    println!("  folio doctor");
    println!("  {}", "-".repeat(50));

    let mut issues = 0;
    for result in &results {
        if result.status != CheckStatus::Pass {
            issues += 1;
        }
        println!("{}", format_line(result, use_color));
    }

    println!();
    match issues {
        0 => println!("  All checks passed."),
        1 => println!("  1 issue found."),
        n => println!("  {n} issues found."),
    }
    println!();

    Ok(())
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!(
            "    {symbol} {:<20} {message} ({duration_ms}ms)",
            result.name
        )
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

/// Open the database (running migrations) and run the storage health check.
async fn check_database(config: &FolioConfig) -> CheckResult {
    let start = Instant::now();
    let db_path = &config.storage.database_path;

    if !Path::new(db_path).exists() {
        return CheckResult::new(
            "Database",
            CheckStatus::Warn,
            format!("not found: {db_path} (will be created on first run)"),
            start,
        );
    }

    let storage = SqliteStorage::new(config.storage.clone());
    if let Err(e) = storage.initialize().await {
        return CheckResult::new("Database", CheckStatus::Fail, format!("open failed: {e}"), start);
    }

    let result = match storage.health_check().await {
        Ok(HealthStatus::Healthy) => {
            let tickets = storage
                .list_tickets(&TicketFilter::default())
                .await
                .map(|t| t.len())
                .unwrap_or_default();
            CheckResult::new(
                "Database",
                CheckStatus::Pass,
                format!("connected ({tickets} tickets)"),
                start,
            )
        }
        Ok(HealthStatus::Degraded(msg)) => {
            CheckResult::new("Database", CheckStatus::Warn, msg, start)
        }
        Ok(HealthStatus::Unhealthy(msg)) => {
            CheckResult::new("Database", CheckStatus::Fail, msg, start)
        }
        Err(e) => CheckResult::new("Database", CheckStatus::Fail, e.to_string(), start),
    };
    let _ = storage.close().await;
    result
}

/// Keys `serve` requires that are unset or blank.
fn missing_credentials(config: &FolioConfig) -> Vec<String> {
    match folio_config::validate_serve_requirements(config) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .into_iter()
            .filter_map(|e| match e {
                ConfigError::MissingKey { key } => Some(key),
                _ => None,
            })
            .collect(),
    }
}

fn check_credentials(config: &FolioConfig) -> CheckResult {
    let start = Instant::now();
    let missing = missing_credentials(config);
    if missing.is_empty() {
        CheckResult::new("WhatsApp credentials", CheckStatus::Pass, "configured", start)
    } else {
        CheckResult::new(
            "WhatsApp credentials",
            CheckStatus::Fail,
            format!("missing: {}", missing.join(", ")),
            start,
        )
    }
}

fn check_signature(config: &FolioConfig) -> CheckResult {
    let start = Instant::now();
    if config.whatsapp.app_secret.is_some() {
        CheckResult::new("Webhook signatures", CheckStatus::Pass, "enforced", start)
    } else {
        CheckResult::new(
            "Webhook signatures",
            CheckStatus::Warn,
            "whatsapp.app_secret not set; deliveries are not authenticated",
            start,
        )
    }
}

/// Look up the configured phone number on the Graph API.
async fn check_graph_api(config: &FolioConfig) -> CheckResult {
    let start = Instant::now();
    let sender = match WhatsAppSender::new(&config.whatsapp) {
        Ok(sender) => sender,
        Err(_) => {
            return CheckResult::new(
                "Graph API",
                CheckStatus::Warn,
                "skipped (no credentials)",
                start,
            );
        }
    };

    match sender.health_check().await {
        Ok(HealthStatus::Healthy) => {
            CheckResult::new("Graph API", CheckStatus::Pass, "reachable", start)
        }
        Ok(HealthStatus::Degraded(msg)) => {
            CheckResult::new("Graph API", CheckStatus::Warn, msg, start)
        }
        Ok(HealthStatus::Unhealthy(msg)) => {
            CheckResult::new("Graph API", CheckStatus::Fail, msg, start)
        }
        Err(e) => CheckResult::new("Graph API", CheckStatus::Fail, e.to_string(), start),
    }
}
