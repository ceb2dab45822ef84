use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use warehouse_fleet::adapters::outbound::{init_buffered_logger, init_combined_logger, HttpBackend};
use warehouse_fleet::application::FleetSupervisor;
use warehouse_fleet::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // tracing for process diagnostics; the `log` facade stays free for fast_log.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "fleet.toml".to_string());
    let config = Config::load(Some(&config_path))
        .await
        .with_context(|| format!("loading configuration from {}", config_path))?;

    info!("Configuration loaded");
    info!("Backend: {}", config.backend.base_url);
    info!(
        "Agents: {}, interval: {}s, ticks: {}",
        config.fleet.agent_count,
        config.fleet.interval_secs,
        config
            .fleet
            .max_ticks
            .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
    );

    let mut logger = init_combined_logger(config.logging.file.as_deref());
    if let Some(capacity) = config.logging.buffer {
        logger = init_buffered_logger(logger, capacity);
    }

    let backend = HttpBackend::new(&config.backend.base_url, config.request_timeout())
        .context("building HTTP client")?;
    let supervisor = FleetSupervisor::new(Arc::new(backend), logger);
    let fleet = supervisor.start(config.fleet.agent_count, &config.agent_settings());

    let cancel = fleet.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, stopping agents");
            cancel.cancel();
        }
    });

    for result in fleet.join().await {
        match result {
            Ok(summary) => info!(
                agent = %summary.agent_id,
                position = %summary.position,
                battery = summary.battery_level,
                ticks = summary.stats.ticks,
                delivered = summary.stats.delivered,
                skipped = summary.stats.skipped,
                logins = summary.stats.logins,
                "agent stopped"
            ),
            Err(e) => error!("agent task failed: {}", e),
        }
    }

    info!("All agents stopped");
    // fast_log appends on a background thread
    log::logger().flush();
    Ok(())
}
