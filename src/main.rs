//! Stats service entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use statsboard::api::{create_router, AppState};
use statsboard::config::Config;
use statsboard::metrics;
use statsboard::store::{StatsRecord, StatsStore};

/// Single-record social stats service.
#[derive(Parser, Debug)]
#[command(name = "statsboard")]
#[command(about = "Serves a persisted stats record over JSON plus static files")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// Listen port (overrides PORT from the environment).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Run {
        /// Listen port (overrides PORT from the environment).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("statsboard=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Run { port }) => cmd_run(port).await,
        None => cmd_run(args.port).await,
    }
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("STATSBOARD - CONFIGURATION CHECK");
    println!("======================================================================");

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

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Port: {}", config.port);
    println!("  Stats file: {}", config.stats_path.display());
    println!("  Static root: {}", config.static_dir.display());
    match config.instagram_followers {
        Some(f) => println!("  Seed followers: {}", f),
        None => println!("  Seed followers: (default)"),
    }
    match config.engagement_rate {
        Some(r) => println!("  Seed engagement rate: {}", r),
        None => println!("  Seed engagement rate: (default)"),
    }
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server.
async fn cmd_run(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = Config::load()?;

    if let Some(port) = port_override {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let prometheus = metrics::install()?;

    let store = StatsStore::open(
        &config.stats_path,
        StatsRecord::seeded(config.instagram_followers, config.engagement_rate),
    )
    .await?;
    info!("Stats file: {}", store.path().display());

    let state = AppState::new(store, prometheus);
    let router = create_router(state, &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server running at http://localhost:{}", config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve on ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
