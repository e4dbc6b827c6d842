//! Platform-wide community aggregation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tracing::instrument;

use shared::math::percentage;
use shared::window::{compare, ComparisonWindows, WindowCode};

use crate::models::platform::{
    ActiveCommunities, GrowingCommunity, GrowthPoint, PlatformAnalytics, ReferralStats,
    WindowedMetric,
};
use crate::source::{CommunityRecord, DataSource, ReferralCounts};

use super::AnalyticsError;

/// How many communities the top-growing list carries.
pub const TOP_COMMUNITIES_LIMIT: i64 = 10;

/// Computes cross-community overview metrics for a window.
#[derive(Clone)]
pub struct PlatformAnalyticsService {
    source: Arc<dyn DataSource>,
}

impl PlatformAnalyticsService {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    /// Full platform overview for the window ending at `now`.
    ///
    /// All sub-aggregations are independent, so they are issued as one
    /// fan-out and joined before any arithmetic. Any sub-failure fails the
    /// whole call; there is no partial result.
    #[instrument(skip(self), fields(window = %window))]
    pub async fn overview(
        &self,
        window: WindowCode,
        now: DateTime<Utc>,
    ) -> Result<PlatformAnalytics, AnalyticsError> {
        let windows = ComparisonWindows::new(window, now);
        let (current, previous) = (windows.current, windows.previous);

        let (
            communities_current,
            communities_previous,
            members_current,
            members_previous,
            events_current,
            events_previous,
            active_count,
            top_raw,
            growth_days,
            referrals,
        ) = tokio::try_join!(
            self.source.count_communities_created(current),
            self.source.count_communities_created(previous),
            self.source.count_members_joined(current),
            self.source.count_members_joined(previous),
            self.source.count_events_created(current),
            self.source.count_events_created(previous),
            self.source.count_active_communities(current),
            self.source.top_communities_by_members(TOP_COMMUNITIES_LIMIT),
            self.source.member_join_days(None, current),
            self.source.referral_outcomes(None, current),
        )?;

        let top_growing = self.enrich_top_communities(top_raw, &windows).await?;

        Ok(PlatformAnalytics {
            window,
            total_communities: windowed(communities_current, communities_previous),
            total_members: windowed(members_current, members_previous),
            total_events: windowed(events_current, events_previous),
            active_communities: ActiveCommunities {
                count: active_count,
                percentage: percentage(active_count, communities_current),
            },
            top_growing_communities: top_growing,
            growth_series: growth_days
                .into_iter()
                .map(|d| GrowthPoint {
                    date: d.day,
                    new_members: d.joins,
                })
                .collect(),
            referrals: referral_stats(referrals),
            generated_at: now,
            degraded: false,
        })
    }

    /// Adds windowed join/event counts and the growth score to each of the
    /// top communities, preserving the incoming order (lifetime size).
    async fn enrich_top_communities(
        &self,
        top: Vec<CommunityRecord>,
        windows: &ComparisonWindows,
    ) -> Result<Vec<GrowingCommunity>, AnalyticsError> {
        let current = windows.current;
        let enriched = try_join_all(top.into_iter().map(|community| async move {
            let (new_members, new_events) = tokio::try_join!(
                self.source
                    .count_community_members_joined(community.id, current),
                self.source
                    .count_community_events_created(community.id, current),
            )?;
            Ok::<_, AnalyticsError>(GrowingCommunity {
                id: community.id,
                name: community.name,
                avatar_url: community.avatar_url,
                member_count: community.member_count,
                new_members,
                new_events,
                growth_score: growth_score(new_members, new_events),
            })
        }))
        .await?;
        Ok(enriched)
    }
}

/// `new_members * 0.7 + new_events * 100`, over windowed counts. The
/// lifetime leaderboard score uses the same weights but different inputs;
/// the two are deliberately kept separate.
fn growth_score(new_members: i64, new_events: i64) -> f64 {
    new_members as f64 * 0.7 + new_events as f64 * 100.0
}

fn windowed(current: i64, previous: i64) -> WindowedMetric {
    let cmp = compare(current, previous);
    WindowedMetric {
        current,
        previous,
        delta: cmp.delta,
        is_positive: cmp.is_positive,
    }
}

fn referral_stats(counts: ReferralCounts) -> ReferralStats {
    ReferralStats {
        total: counts.total,
        successful: counts.successful,
        success_rate: percentage(counts.successful, counts.total),
    }
}
