//! Phresh Marketplace - Main Entry Point
//! SQLite store + JSON-RPC server for the offer lifecycle and evaluations

mod config;
mod logging;
mod telemetry;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use phresh_api_rpc::{RpcHandler, RpcServer};
use phresh_core::port::{SystemTimeProvider, TimeProvider};
use phresh_infra_sqlite::{
    create_pool, run_migrations, SqliteEvaluationRepository, SqliteJobDirectory,
    SqliteOfferRepository,
};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let settings = Settings::load().context("Failed to load configuration")?;

    // 2. Initialize logging
    let _log_guard = logging::init(&settings)?;

    info!(version = phresh_core::VERSION, "Phresh marketplace starting...");

    // 3. Initialize database
    let db_url = settings.database_url();
    if !settings.is_in_memory() {
        if let Some(parent) = Path::new(&db_url).parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    info!(db_path = %db_url, "Initializing database...");
    let pool = create_pool(&db_url)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies (DI wiring)
    // One offer repository: its job locks must be shared by every writer
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let offers = Arc::new(SqliteOfferRepository::new(pool.clone()));
    let jobs = Arc::new(SqliteJobDirectory::new(pool.clone(), time_provider.clone()));
    let evaluations = Arc::new(SqliteEvaluationRepository::new(pool.clone()));

    let handler = Arc::new(RpcHandler::new(
        offers.clone(),
        jobs,
        offers,
        evaluations,
        time_provider,
    ));

    // 5. Start JSON-RPC server
    let rpc_handle = RpcServer::new(settings.rpc_config(), handler)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!("System ready. Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;
    pool.close().await;
    telemetry::shutdown();

    info!("Shutdown complete.");

    Ok(())
}
