use anyhow::{Context, Result};
use bastion_sessions::cli::{Args, Commands};
use bastion_sessions::config::{BastionConfig, ConfigDiscovery, DEFAULT_LOG_LEVEL, log_directive};
use bastion_sessions::control::Heartbeat;
use bastion_sessions::session::{SessionManager, SessionRegistry};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, reload};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    // RUST_LOG takes precedence over the configured level
    let env_filter = EnvFilter::try_from_default_env().ok();
    let filter_from_env = env_filter.is_some();
    let (filter, filter_handle) = reload::Layer::new(
        env_filter.unwrap_or_else(|| EnvFilter::new(log_directive(DEFAULT_LOG_LEVEL))),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    let config = load_config(args.config.as_deref())?;
    if !filter_from_env {
        filter_handle
            .reload(EnvFilter::new(config.log_directive()))
            .context("Failed to apply configured log level")?;
    }

    match args.command {
        Commands::Run {
            core_host,
            heartbeat_interval,
        } => {
            let config = BastionConfig {
                core_host: core_host.unwrap_or(config.core_host),
                heartbeat_interval_secs: heartbeat_interval.unwrap_or(config.heartbeat_interval_secs),
                ..config
            };
            config.validate()?;
            run(config).await
        }
        Commands::ShowConfig => {
            ConfigDiscovery::show_discovery_info();
            println!();
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<BastionConfig> {
    match path {
        Some(path) => BastionConfig::from_toml_file(path),
        None => ConfigDiscovery::discover_config(),
    }
}

async fn run(config: BastionConfig) -> Result<()> {
    info!("Starting session core, core server {}", config.core_host);

    let control_plane = config
        .control_plane()
        .context("Failed to create core server client")?;
    let registry = SessionRegistry::new();
    let manager = SessionManager::new(
        registry,
        Arc::new(control_plane),
        config.session_manager_config(),
    );

    let heartbeat = Heartbeat::new(manager.clone(), config.heartbeat_interval()).spawn();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutting down, killing {} live sessions", manager.registry().len().await);
    for session_id in manager.alive_sessions().await {
        // connections remove themselves once they observe the signal
        let _ = manager.kill_session(&session_id).await;
    }
    heartbeat.shutdown().await;

    Ok(())
}
