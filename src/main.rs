//! Casting agency server binary

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use casting_agency::{create_router, AgencyConfig, AppState, Authorizer, CastingStore, MemoryStore};

#[derive(Debug, Parser)]
#[command(name = "casting-agency", version, about = "Casting agency REST API")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "AGENCY_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, overrides the configuration
    #[arg(short, long)]
    bind: Option<String>,
}

async fn open_store(config: &AgencyConfig) -> anyhow::Result<Arc<dyn CastingStore>> {
    match config.database.url.as_deref() {
        #[cfg(feature = "postgres")]
        Some(url) => {
            let store = casting_agency::PostgresStore::new(url)
                .await
                .context("failed to open PostgreSQL store")?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "postgres"))]
        Some(_) => {
            warn!("database.url is set but the postgres feature is disabled; using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        None => Ok(Arc::new(MemoryStore::new())),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AgencyConfig::load(path)?,
        None => AgencyConfig::default(),
    };
    config.apply_env();
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    config.validate()?;

    let store = open_store(&config).await?;
    let authorizer = Arc::new(Authorizer::from_config(&config.auth)?);

    let state = Arc::new(AppState::new(store.clone(), authorizer).with_excited(config.server.excited));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind to {}", config.server.bind))?;

    info!(addr = %config.server.bind, store = store.backend(), "Casting agency listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
