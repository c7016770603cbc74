//! tempaste server entrypoint.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tempaste_server::{
    config::Config, db::Database, logging, resolve_bind_address, serve_router, spawn_purge_task,
    AppState,
};

#[derive(Debug, Parser)]
#[command(name = "tempaste", version, about = "Temporary paste server")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Port to listen on (overrides PORT)
    #[arg(short, long, global = true)]
    port: Option<u16>,

    /// Append logs to this file instead of stdout (overrides LOG_FILE)
    #[arg(short = 'l', long = "log-file", alias = "logfile", global = true)]
    log_file: Option<String>,

    /// Emit logs as JSON lines
    #[arg(short, long, global = true)]
    json: bool,

    /// Log request and lifecycle activity
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Command {
    /// Start the HTTP server
    Start,
    /// Print the version and exit
    Version,
}

impl Cli {
    /// Layer command-line overrides on top of env-derived config.
    fn apply(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }
        config.log_json |= self.json;
        config.verbose |= self.verbose;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.command == Command::Version {
        println!("tempaste {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // A missing .env is normal; anything else set in the process env wins.
    let dotenv = dotenvy::dotenv();

    let mut config = Config::from_env();
    cli.apply(&mut config);
    logging::init_tracing(&config)?;
    if let Err(err) = dotenv {
        if !err.not_found() {
            tracing::warn!("Ignoring unreadable .env file: {}", err);
        }
    }
    config.validate().context("Invalid configuration")?;

    let database = Database::open(&config.db_path)?;
    let state = AppState::new(config.clone(), &database);

    let sweeper = config
        .purge_interval()
        .map(|interval| spawn_purge_task(state.service.clone(), interval));

    let bind_addr = resolve_bind_address(&config);
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("tempaste running at http://{}", actual_addr);

    let serve_result = serve_router(listener, state, shutdown_signal()).await;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    tracing::info!("tempaste stopped");

    serve_result?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::warn!("Shutdown signal received");
}
