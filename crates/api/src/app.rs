use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::source::DataSource;

use crate::config::Config;
use crate::middleware::trace_id;
use crate::routes::{community, health, leaderboard, platform};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn DataSource>,
    pub config: Arc<Config>,
    /// `live` or `synthetic`, fixed at startup.
    pub source_kind: String,
    /// True when the synthetic dataset is serving in place of the live
    /// store. Stamped onto every analytics response.
    pub degraded: bool,
}

pub fn create_app(config: Config, source: Arc<dyn DataSource>, degraded: bool) -> Router {
    let config = Arc::new(config);

    let source_kind = if degraded { "synthetic" } else { "live" }.to_string();
    let state = AppState {
        source,
        config: config.clone(),
        source_kind,
        degraded,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let analytics_routes = Router::new()
        .route(
            "/api/v1/analytics/platform",
            get(platform::platform_analytics),
        )
        .route(
            "/api/v1/communities/:community_id/analytics",
            get(community::community_analytics),
        )
        .route("/api/v1/leaderboard", get(leaderboard::leaderboard));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live));

    Router::new()
        .merge(public_routes)
        .merge(analytics_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
