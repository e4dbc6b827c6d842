//! Community leaderboard endpoint.

use axum::extract::{Query, State};
use axum::Json;
use std::time::Duration;
use validator::Validate;

use domain::models::leaderboard::{CommunityStanding, LeaderboardPage, LeaderboardQuery};
use domain::services::{paginate, rank_standings};

use crate::app::AppState;
use crate::error::ApiError;

/// `GET /api/v1/leaderboard`
///
/// Ranks all communities by lifetime counters, filtered and sorted per
/// the query, and serves one page. The handler is stateless: it fetches
/// a fresh roster snapshot and re-ranks per request, which keeps ranks
/// consistent within a response without any cross-request cache.
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardPage>, ApiError> {
    query.validate()?;

    let budget = Duration::from_secs(state.config.analytics.query_timeout_secs);
    let records = tokio::time::timeout(budget, state.source.leaderboard_roster())
        .await
        .map_err(ApiError::from)?
        .map_err(|e| ApiError::from(domain::services::AnalyticsError::Source(e)))?;

    let roster: Vec<CommunityStanding> = records
        .into_iter()
        .map(|r| CommunityStanding {
            id: r.id,
            name: r.name,
            member_count: r.member_count,
            events_created: r.events_created,
        })
        .collect();

    let ranked = rank_standings(&roster, &query);
    let page = query.page.unwrap_or(1);
    let page_size = query
        .page_size
        .unwrap_or(state.config.analytics.default_page_size);

    let mut page = paginate(&ranked, page, page_size);
    page.degraded = state.degraded;

    Ok(Json(page))
}
