//! Platform-wide analytics endpoint.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;

use domain::models::platform::PlatformAnalytics;
use domain::services::PlatformAnalyticsService;
use shared::window::WindowCode;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct PlatformParams {
    /// Comparison window: `7d`, `30d`, or `90d`. Anything else falls back
    /// to `30d`.
    pub window: Option<String>,
}

/// `GET /api/v1/analytics/platform`
///
/// Aggregates platform-wide metrics over the requested window. The whole
/// fan-out runs under the configured per-request budget; a slow source
/// fails the request rather than returning partial numbers.
pub async fn platform_analytics(
    State(state): State<AppState>,
    Query(params): Query<PlatformParams>,
) -> Result<Json<PlatformAnalytics>, ApiError> {
    let window = params
        .window
        .as_deref()
        .map(WindowCode::parse)
        .unwrap_or_default();

    let service = PlatformAnalyticsService::new(state.source.clone());
    let budget = Duration::from_secs(state.config.analytics.query_timeout_secs);

    let mut analytics = tokio::time::timeout(budget, service.overview(window, Utc::now()))
        .await
        .map_err(ApiError::from)?
        .map_err(ApiError::from)?;
    analytics.degraded = state.degraded;

    Ok(Json(analytics))
}
