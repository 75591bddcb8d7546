use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::SecretString;

use lingua_gateway::{summary, translate, ChatSummarizer, MyMemoryTranslator};
use lingua_server::ServerConfig;
use lingua_store::Database;
use lingua_telemetry::{init_telemetry, TelemetryConfig};

const METRICS_SNAPSHOT_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let telemetry_config = TelemetryConfig::default();
    let retention_days = telemetry_config.metrics_retention_days;
    let telemetry = init_telemetry(telemetry_config);

    tracing::info!("Starting Lingua server");

    if let Some(metrics) = telemetry.metrics().cloned() {
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(METRICS_SNAPSHOT_INTERVAL);
            tick.tick().await; // First tick fires immediately
            loop {
                tick.tick().await;
                if let Err(e) = metrics.snapshot() {
                    tracing::warn!(error = %e, "metrics snapshot failed");
                }
                if let Err(e) = metrics.prune(retention_days) {
                    tracing::warn!(error = %e, "metrics prune failed");
                }
            }
        });
    }

    // Database path
    let db_path = match std::env::var("LINGUA_DB") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs_home().join(".lingua").join("database").join("lingua.db"),
    };
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).context("create database directory")?;
    }
    let db = Database::open(&db_path).context("open database")?;
    tracing::info!(path = %db_path.display(), "Database opened");

    // Upstream clients
    let translate_url = std::env::var("LINGUA_TRANSLATE_URL")
        .unwrap_or_else(|_| translate::DEFAULT_BASE_URL.to_string());
    let summary_url = std::env::var("LINGUA_SUMMARY_URL")
        .unwrap_or_else(|_| summary::DEFAULT_BASE_URL.to_string());
    let api_key = std::env::var(summary::CREDENTIAL_VAR)
        .ok()
        .map(SecretString::from);
    if api_key.is_none() {
        tracing::warn!(
            "{} not set; summary generation will fail",
            summary::CREDENTIAL_VAR
        );
    }

    let translator = Arc::new(MyMemoryTranslator::new(translate_url)?);
    let summarizer = Arc::new(ChatSummarizer::new(summary_url, api_key)?);

    // Start server
    let port = match std::env::var("LINGUA_PORT") {
        Ok(raw) => raw.parse::<u16>().context("parse LINGUA_PORT")?,
        Err(_) => ServerConfig::default().port,
    };
    let config = ServerConfig {
        port,
        ..Default::default()
    };
    let handle = lingua_server::start(
        config,
        db,
        translator,
        summarizer,
        telemetry.metrics().cloned(),
    )
    .await
    .context("start server")?;

    tracing::info!(port = handle.port, "Lingua server ready");

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("listen for ctrl+c")?;

    tracing::info!("Shutting down");
    Ok(())
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
