//! Pixel Grid Server
//!
//! A Rust-based server that:
//! - Accepts drawings posted as data URIs
//! - Resamples them to the configured LED grid
//! - Forwards the cells in serpentine wiring order to the display controller
//! - Shuts down gracefully on SIGTERM/SIGINT

use clap::Parser;
use pixel_grid_server::config::{Config, OutputMode, DEFAULT_CONFIG_PATH};
use pixel_grid_server::web::WebServer;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "pixel-grid-server")]
#[command(about = "Turns drawings into colour grids for serpentine-wired LED matrices")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Web server port (overrides config, default: 8888)
    #[arg(long = "http-port")]
    http_port: Option<u16>,

    /// Display controller URL (overrides config)
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Grid width in cells (overrides config)
    #[arg(long)]
    grid_width: Option<u32>,

    /// Grid height in cells (overrides config)
    #[arg(long)]
    grid_height: Option<u32>,

    /// Response encoding (overrides config)
    #[arg(long, value_enum)]
    mode: Option<OutputMode>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Apply command line overrides on top of the loaded config
    fn apply(&self, config: &mut Config) {
        if let Some(port) = self.http_port {
            config.web_port = port;
        }
        if let Some(url) = &self.endpoint_url {
            config.endpoint_url = url.clone();
        }
        if let Some(width) = self.grid_width {
            config.grid_width = width;
        }
        if let Some(height) = self.grid_height {
            config.grid_height = height;
        }
        if let Some(mode) = self.mode {
            config.output_mode = mode;
        }
        config.verbose |= self.verbose;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration before logging so its verbose flag counts
    let loaded = Config::load(&args.config);
    let verbose = args.verbose || loaded.as_ref().is_ok_and(|c| c.verbose);

    init_logging(verbose);

    tracing::info!("Starting Pixel Grid Server");

    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from {}: {}", args.config, e);
        tracing::info!("Using default configuration");
        Config::default()
    });
    args.apply(&mut config);

    config.validate()?;

    tracing::info!(
        "Grid {}x{}, output {:?}, controller {}",
        config.grid_width,
        config.grid_height,
        config.output_mode,
        config.endpoint().unwrap_or("disabled")
    );

    // Setup shutdown signal handling
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let port = config.web_port;
    let web_server = WebServer::new(config);

    // Spawn web server task
    let web_shutdown = shutdown_tx.subscribe();
    let web_handle = tokio::spawn(async move {
        if let Err(e) = web_server.run_with_shutdown(port, web_shutdown).await {
            tracing::error!("Web server error: {}", e);
        }
    });

    // Wait for shutdown signal
    wait_for_shutdown().await;
    tracing::info!("Shutdown signal received");

    let _ = shutdown_tx.send(());

    tokio::select! {
        _ = web_handle => {},
        _ = tokio::time::sleep(std::time::Duration::from_secs(5)) => {
            tracing::warn!("Web server shutdown timeout");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
///
/// Default level is "warn"; use --verbose for "debug".
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("pixel_grid_server={}", level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
async fn wait_for_shutdown() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("Failed to setup SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("Failed to setup SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM");
        }
        _ = sigint.recv() => {
            tracing::info!("Received SIGINT");
        }
    }
}
