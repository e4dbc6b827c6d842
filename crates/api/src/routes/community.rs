//! Single-community analytics endpoint.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use std::time::Duration;
use uuid::Uuid;

use domain::models::community::CommunityAnalytics;
use domain::services::CommunityAnalyticsService;
use shared::window::WindowCode;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::platform::PlatformParams;

/// `GET /api/v1/communities/:id/analytics`
///
/// Aggregates analytics for one community. Returns 404 before any other
/// work when the community does not exist.
pub async fn community_analytics(
    State(state): State<AppState>,
    Path(community_id): Path<Uuid>,
    Query(params): Query<PlatformParams>,
) -> Result<Json<CommunityAnalytics>, ApiError> {
    let window = params
        .window
        .as_deref()
        .map(WindowCode::parse)
        .unwrap_or_default();

    let service = CommunityAnalyticsService::new(state.source.clone());
    let budget = Duration::from_secs(state.config.analytics.query_timeout_secs);

    let mut analytics =
        tokio::time::timeout(budget, service.analyze(community_id, window, Utc::now()))
            .await
            .map_err(ApiError::from)?
            .map_err(ApiError::from)?;
    analytics.degraded = state.degraded;

    Ok(Json(analytics))
}
