//! FraudLens Core - Main Entry Point

use fraudlens_core::api::{dashboard, wake_up};
use fraudlens_core::constants::{APP_NAME, APP_VERSION};
use fraudlens_core::{AppContext, ServiceConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} core v{}...", APP_NAME, APP_VERSION);

    let config = ServiceConfig::from_env();
    log::info!("   Backend: {}", config.backend_url);
    log::info!("   Session: {}", config.session_path().display());

    let ctx = match AppContext::new(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            log::error!("Failed to initialize backend client: {}", e);
            std::process::exit(1);
        }
    };

    if ctx.start().await {
        log::info!("Backend ready");
    } else {
        log::warn!("Backend unreachable - dashboard stays on session data");
    }

    let view = dashboard::load(&ctx);
    log::info!(
        "Dashboard: {} data, {} records, {} flagged (updated {})",
        view.info.data_source,
        view.info.total_records,
        view.info.fraud_count,
        view.info.last_updated
    );

    let status = wake_up::backend_status(&ctx);
    log::info!(
        "Keep-alive: {} (every {:?}), liveness {}",
        if status.periodic_running { "running" } else { "off" },
        ctx.wake_up().interval(),
        status.liveness
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }

    ctx.shutdown();
}
