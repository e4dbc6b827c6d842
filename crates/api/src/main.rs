use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use domain::source::DataSource;
use persistence::db;
use persistence::sources::{LiveSource, SyntheticSource};

mod app;
mod config;
mod error;
mod middleware;
mod routes;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging);

    info!("Starting Community Pulse API v{}", env!("CARGO_PKG_VERSION"));

    // Select the data source once; every request for the lifetime of the
    // process is served from this choice.
    let (source, degraded) = select_source(&config).await?;

    // Build application
    let app = app::create_app(config.clone(), source, degraded);

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects the configured data source.
///
/// With `analytics.source = "live"`, a failed connection either aborts
/// startup or, when `fallback_synthetic` is set, swaps in the seeded
/// synthetic dataset and marks all responses degraded.
async fn select_source(config: &config::Config) -> Result<(Arc<dyn DataSource>, bool)> {
    if config.analytics.source == "synthetic" {
        info!(
            seed = config.analytics.synthetic_seed,
            "Serving the synthetic dataset"
        );
        return Ok((
            Arc::new(SyntheticSource::new(config.analytics.synthetic_seed)),
            true,
        ));
    }

    let db_config = db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        connect_timeout_secs: config.database.connect_timeout_secs,
        idle_timeout_secs: config.database.idle_timeout_secs,
    };

    match db::create_pool(&db_config).await {
        Ok(pool) => {
            info!("Connected to the live data store");
            Ok((Arc::new(LiveSource::new(pool)), false))
        }
        Err(err) if config.analytics.fallback_synthetic => {
            warn!(
                error = %err,
                seed = config.analytics.synthetic_seed,
                "Live data store unreachable, falling back to the synthetic dataset"
            );
            Ok((
                Arc::new(SyntheticSource::new(config.analytics.synthetic_seed)),
                true,
            ))
        }
        Err(err) => Err(err.into()),
    }
}
