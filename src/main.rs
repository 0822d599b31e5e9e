//! Feature-flag cache and broadcast service entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flagcast::api::{create_router, AppState};
use flagcast::config::Config;
use flagcast::flags::{Broadcaster, FlagCache, FlagSet, Poller};
use flagcast::metrics;
use flagcast::store::{HttpParameterStore, ParameterStore};
use flagcast::utils::shutdown_signal;

/// Feature-flag cache and broadcast service.
#[derive(Parser, Debug)]
#[command(name = "flagcast")]
#[command(about = "Serves feature flags from a remote parameter store with SSE push updates")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the flag service (default).
    Run {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Fetch the flag parameter once and print the result.
    FetchFlag,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("flagcast=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::FetchFlag) => cmd_fetch_flag().await,
        Some(Command::Run { port }) => cmd_run(port).await,
        None => cmd_run(args.port).await,
    }
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("FLAGCAST - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Parameter Store: {}", config.parameter_store_url);
    println!("  Region: {}", config.parameter_store_region);
    println!("  Flag Parameter: {}", config.flag_parameter);
    println!("  Poll Interval: {}s", config.poll_interval_seconds);
    println!("  HTTP Timeout: {}ms", config.http_timeout_ms);
    println!("  Port: {}", config.port);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Fetch the flag parameter once and print the result.
async fn cmd_fetch_flag() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("FLAGCAST - ONE-SHOT FLAG FETCH");
    println!("======================================================================");

    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    println!("Store: {}", config.parameter_store_url);
    println!("Region: {}", config.parameter_store_region);
    println!("Parameter: {}", config.flag_parameter);

    let store = HttpParameterStore::new(&config);

    print!("\nFetching... ");
    match store.fetch_parameter(&config.flag_parameter).await {
        Ok(raw) => {
            println!("OK");
            let flags = FlagSet::from_raw(&raw);
            println!("  Raw value: {:?}", raw);
            println!("  Flag set: {}", serde_json::to_string(&flags)?);
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
        }
    }

    println!("======================================================================");

    Ok(())
}

/// Run the flag service.
async fn cmd_run(port_override: Option<u16>) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    info!("Configuration loaded successfully");
    info!("Parameter store: {}", config.parameter_store_url);
    info!("Flag parameter: {}", config.flag_parameter);
    info!("Poll interval: {}s", config.poll_interval_seconds);

    // Initialize metrics
    let metrics_handle = metrics::init_metrics()?;

    // Create shared state
    let cache = FlagCache::new(FlagSet::default());
    let broadcaster = Arc::new(Broadcaster::new());

    // Spawn the poller
    let store = HttpParameterStore::new(&config);
    let cancel = CancellationToken::new();
    let poller = Poller::new(store, cache.clone(), broadcaster.clone(), &config);
    let poller_handle = tokio::spawn(poller.run(cancel.clone()));

    // Build the router
    let state = AppState { cache, broadcaster };
    let router = create_router(state).route(
        "/metrics",
        axum::routing::get(move || std::future::ready(metrics_handle.render())),
    );

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the poller before exiting
    info!("Shutting down...");
    cancel.cancel();
    let _ = poller_handle.await;

    Ok(())
}
