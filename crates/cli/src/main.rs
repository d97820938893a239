//! # Waystation
//!
//! Offline-first caching front for a single web application origin.

mod bootstrap;
mod di;
mod server;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use waystation_domain::{CliOverrides, Config, LifecycleState};

use crate::bootstrap::{init_logging, init_storage, load_config, log_config_summary};
use crate::di::Services;
use crate::server::{start_http_server, AppState};

#[derive(Parser)]
#[command(name = "waystation")]
#[command(version)]
#[command(about = "Offline-first request cache for a web application")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Bind address for the HTTP front
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Port for the HTTP front
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Application origin, e.g. https://app.example
    #[arg(short = 'o', long)]
    origin: Option<String>,

    /// Cache database URL
    #[arg(long)]
    database_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Install, activate and serve (default)
    Serve,
    /// Seed the static store from the manifest
    Install,
    /// Purge stores that are not part of the current generation
    Activate,
    /// List stores and their entry counts
    Stores,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        bind_address: cli.bind,
        port: cli.port,
        app_origin: cli.origin,
        database_url: cli.database_url,
        log_level: cli.log_level,
    };

    let config = load_config(cli.config.as_deref(), overrides)?;
    init_logging(&config);
    log_config_summary(&config, cli.config.as_deref());

    info!("Starting Waystation v{}", env!("CARGO_PKG_VERSION"));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config).await,
        Command::Install => install(&config).await,
        Command::Activate => activate(&config).await,
        Command::Stores => list_stores(&config).await,
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    let storage = init_storage(&config.storage).await?;
    let services = Services::build(config, storage, LifecycleState::Installing)?;

    let report = services.lifecycle.install().await?;
    if !report.is_complete() {
        warn!(
            failed = report.failed.len(),
            "Static store seeded partially; missing assets will be fetched on demand"
        );
    }
    services.lifecycle.activate().await?;

    let bind_addr: SocketAddr =
        format!("{}:{}", config.server.bind_address, config.server.port).parse()?;
    let state = AppState {
        router: Arc::clone(&services.router),
        app_origin: config.app_origin()?,
    };

    start_http_server(bind_addr, state, shutdown_signal()).await?;

    info!("Draining background refreshes");
    services.router.engine().wait_for_background().await;

    let snapshot = services.metrics.snapshot();
    info!(
        cache_hits = snapshot.cache_hits,
        cache_misses = snapshot.cache_misses,
        hit_rate = snapshot.hit_rate(),
        network_failures = snapshot.network_failures,
        synthesized = snapshot.synthesized_responses,
        evictions = snapshot.evictions,
        background_refreshes = snapshot.background_refreshes,
        passthrough = snapshot.passthrough,
        "Shutdown complete"
    );

    Ok(())
}

async fn install(config: &Config) -> anyhow::Result<()> {
    let storage = init_storage(&config.storage).await?;
    let services = Services::build(config, storage, LifecycleState::Installing)?;

    let report = services.lifecycle.install().await?;
    for path in &report.cached {
        println!("cached  {path}");
    }
    for failure in &report.failed {
        println!("failed  {}  ({})", failure.path, failure.error);
    }

    Ok(())
}

async fn activate(config: &Config) -> anyhow::Result<()> {
    let storage = init_storage(&config.storage).await?;
    let services = Services::build(config, storage, LifecycleState::Installed)?;

    let report = services.lifecycle.activate().await?;
    for name in &report.deleted {
        println!("deleted   {name}");
    }
    for name in &report.retained {
        println!("retained  {name}");
    }

    Ok(())
}

async fn list_stores(config: &Config) -> anyhow::Result<()> {
    let storage = init_storage(&config.storage).await?;

    for name in storage.store_names().await? {
        let store = storage.open(&name).await?;
        let current = if config.cache.stores.is_current(&name) {
            "current"
        } else {
            "stale"
        };
        println!("{name}\t{}\t{current}", store.len().await?);
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
