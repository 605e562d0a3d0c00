// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `folio serve` command implementation.
//!
//! Opens SQLite storage, builds the WhatsApp sender and the ingestion
//! pipeline, and serves the webhook gateway until SIGINT/SIGTERM.

use std::sync::Arc;

use folio_config::FolioConfig;
use folio_core::{FolioError, PluginAdapter, StorageAdapter};
use folio_gateway::{GatewayState, HealthState, ServerConfig, WebhookAuth};
use folio_intake::{IngestionPipeline, install_signal_handler};
use folio_storage::SqliteStorage;
use folio_whatsapp::WhatsAppSender;
use tracing::{error, info, warn};

#[cfg(feature = "prometheus")]
use folio_prometheus::PrometheusAdapter;

/// Crates whose logs follow `intake.log_level`; everything else is `warn`.
const LOG_TARGETS: [&str; 8] = [
    "folio",
    "folio_core",
    "folio_config",
    "folio_storage",
    "folio_whatsapp",
    "folio_intake",
    "folio_gateway",
    "folio_prometheus",
];

type MetricsRender = Arc<dyn Fn() -> String + Send + Sync>;

/// Runs the `folio serve` command.
pub async fn run_serve(config: FolioConfig) -> Result<(), FolioError> {
    init_tracing(&config.intake.log_level);

    if let Err(errors) = folio_config::validate_serve_requirements(&config) {
        folio_config::render_errors(&errors);
        return Err(FolioError::Config(
            "serve requires WhatsApp credentials".to_string(),
        ));
    }

    info!(
        name = %config.intake.name,
        dedup_policy = %config.intake.dedup_policy,
        "starting folio serve"
    );

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let sender = Arc::new(WhatsAppSender::new(&config.whatsapp)?);
    info!(endpoint = %sender.messages_url(), "WhatsApp sender ready");

    let prometheus_render = init_metrics()?;

    let pipeline = IngestionPipeline::new(
        storage.clone(),
        storage.clone(),
        storage.clone(),
        sender.clone(),
    )
    .with_dedup_policy(config.intake.dedup_policy);

    if config.whatsapp.app_secret.is_none() {
        warn!("whatsapp.app_secret is not set; webhook signatures will not be checked");
    }

    let state = GatewayState {
        pipeline: Arc::new(pipeline),
        auth: WebhookAuth {
            verify_token: config.whatsapp.verify_token.clone().unwrap_or_default(),
            app_secret: config.whatsapp.app_secret.clone(),
        },
        health: HealthState::new(prometheus_render),
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
        webhook_path: config.gateway.webhook_path.clone(),
    };

    let cancel = install_signal_handler();
    let served = folio_gateway::start_server(&server_config, state, cancel.clone()).await;
    if let Err(e) = &served {
        error!(error = %e, "gateway exited with an error");
    }
    cancel.cancel();

    sender.shutdown().await?;
    storage.close().await?;
    served?;

    info!("folio serve shutdown complete");
    Ok(())
}

#[cfg(feature = "prometheus")]
fn init_metrics() -> Result<Option<MetricsRender>, FolioError> {
    let adapter = Arc::new(PrometheusAdapter::new()?);
    info!("prometheus recorder installed");
    Ok(Some(Arc::new(move || adapter.render())))
}

#[cfg(not(feature = "prometheus"))]
fn init_metrics() -> Result<Option<MetricsRender>, FolioError> {
    Ok(None)
}

/// Filter directive used when `RUST_LOG` is not set.
fn default_filter(log_level: &str) -> String {
    let mut directives: Vec<String> = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={log_level}"))
        .collect();
    directives.push("warn".to_string());
    directives.join(",")
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
