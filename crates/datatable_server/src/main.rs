//! Data-table server entry point.
//!
//! # Responsibility
//! - Load configuration, initialize logging, open the store.
//! - Serve the HTTP API until Ctrl-C, then drain and close the store.

mod config;

use config::ServerConfig;
use datatable_api::{router, AppState};
use datatable_core::db::{open_db, open_db_in_memory};
use datatable_core::{core_version, init_logging, logging_status};
use log::{error, info, warn};
use std::process::ExitCode;
use std::time::Instant;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("datatable-server: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("datatable-server: failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    if let Some((level, dir)) = logging_status() {
        let sink = dir.map_or_else(|| "stderr".to_string(), |dir| dir.display().to_string());
        info!("event=logging_init module=server status=ok level={level} sink={sink}");
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=server_stop module=server status=error error={message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), String> {
    let started_at = Instant::now();
    let conn = if config.is_in_memory() {
        open_db_in_memory()
    } else {
        open_db(&config.database_path)
    }
    .map_err(|err| format!("failed to open store `{}`: {err}", config.database_path))?;

    let state = AppState::new(conn);
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|err| format!("failed to bind {addr}: {err}"))?;
    let local_addr = listener
        .local_addr()
        .map_err(|err| format!("failed to read bound address: {err}"))?;
    info!(
        "event=server_start module=server status=ok version={} addr={local_addr} db={} duration_ms={}",
        core_version(),
        config.database_path,
        started_at.elapsed().as_millis()
    );

    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| format!("server error: {err}"))?;

    if let Err(err) = state.close() {
        warn!("event=db_close module=server status=error error={err}");
    }
    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=shutdown_signal module=server status=error error={err}");
        return;
    }
    info!("event=shutdown_signal module=server status=ok");
}
