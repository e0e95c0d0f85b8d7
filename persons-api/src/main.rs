//! persons-api - person records HTTP service
//!
//! Resolves configuration, opens the SQLite store, wires the enrichment
//! clients and serves the API until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};

use persons_api::clients::EnrichmentClients;
use persons_api::db::{init_database_pool, PersonStore};
use persons_api::{build_router, AppState, PersonService};
use persons_common::config::{ConfigOverrides, ServiceConfig};
use persons_common::logging::init_tracing;

/// Command-line arguments for persons-api
#[derive(Parser, Debug)]
#[command(name = "persons-api")]
#[command(about = "Person records service with name-based enrichment")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level: trace, debug, info, warn, error (overrides LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    /// Request timeout in seconds (overrides TIMEOUT_TIME)
    #[arg(long)]
    timeout: Option<u64>,

    /// Database connection string (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// TOML config file
    #[arg(short, long, env = "PERSONS_CONFIG")]
    config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            log_level: self.log_level.clone(),
            request_timeout_secs: self.timeout,
            database_url: self.database_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ServiceConfig::load(&args.overrides(), args.config.as_deref())
        .context("Failed to load configuration")?;

    init_tracing(config.log_level).context("Failed to initialize tracing")?;

    info!(
        "Starting persons-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!(
        port = config.port,
        log_level = %config.log_level,
        request_timeout_secs = config.request_timeout.as_secs(),
        "Configuration resolved"
    );

    let pool = match init_database_pool(&config.database_url).await {
        Ok(pool) => {
            info!("Connected to database: {}", config.database_url);
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e).context("Database initialization failed");
        }
    };

    let clients = EnrichmentClients::from_config(&config.enrichment)
        .context("Failed to build enrichment clients")?;
    info!(
        age_url = %config.enrichment.age_url,
        gender_url = %config.enrichment.gender_url,
        nationality_url = %config.enrichment.nationality_url,
        "Enrichment sources configured"
    );

    let service = PersonService::new(PersonStore::new(pool), clients);
    let app = build_router(AppState::new(service, config.request_timeout));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("persons-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
