//! Single-community aggregation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::instrument;
use uuid::Uuid;

use shared::math::{percentage, ratio};
use shared::window::{ComparisonWindows, DateRange, WindowCode};

use crate::models::community::{
    CommunityAnalytics, CommunitySummary, EventAnalytics, MemberGrowthPoint, MemberSegmentation,
    RecentMember, ReferralSummary, RetentionAnalysis, SegmentBucket,
};
use crate::source::{DataSource, SourceError};

use super::AnalyticsError;

/// How many rows the recent-members list carries.
pub const RECENT_MEMBERS_LIMIT: i64 = 10;

/// Computes growth, engagement, segmentation, and retention figures for
/// one community.
#[derive(Clone)]
pub struct CommunityAnalyticsService {
    source: Arc<dyn DataSource>,
}

impl CommunityAnalyticsService {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    /// Full analytics for `community_id` over the window ending at `now`.
    ///
    /// An unknown id is a distinct `CommunityNotFound` result, never a
    /// silently substituted community. After the community resolves, the
    /// independent sub-aggregations run as one fan-out; any failure fails
    /// the whole call.
    #[instrument(skip(self), fields(community_id = %community_id, window = %window))]
    pub async fn analyze(
        &self,
        community_id: Uuid,
        window: WindowCode,
        now: DateTime<Utc>,
    ) -> Result<CommunityAnalytics, AnalyticsError> {
        let community = self
            .source
            .find_community(community_id)
            .await?
            .ok_or(AnalyticsError::CommunityNotFound(community_id))?;

        let windows = ComparisonWindows::new(window, now);
        let current = windows.current;

        let (growth_days, event_stats, segmentation, retention, referrals, recent) = tokio::try_join!(
            self.source.member_join_days(Some(community_id), current),
            self.source.community_event_stats(community_id, current),
            self.segmentation(community_id, now),
            self.retention(community_id, current.start, now),
            self.source.referral_outcomes(Some(community_id), current),
            self.source.recent_members(community_id, RECENT_MEMBERS_LIMIT),
        )?;

        Ok(CommunityAnalytics {
            window,
            community: CommunitySummary {
                id: community.id,
                name: community.name,
                avatar_url: community.avatar_url,
                member_count: community.member_count,
                created_at: community.created_at,
            },
            member_growth: growth_days
                .into_iter()
                .map(|d| MemberGrowthPoint {
                    date: d.day,
                    new_members: d.joins,
                })
                .collect(),
            event_analytics: EventAnalytics {
                total_events: event_stats.total_events,
                total_rsvps: event_stats.total_rsvps,
                total_attending: event_stats.total_attending,
                attendance_rate: percentage(event_stats.total_attending, event_stats.total_rsvps),
                avg_rsvps_per_event: ratio(event_stats.total_rsvps, event_stats.total_events),
            },
            member_segmentation: segmentation,
            retention,
            referrals: ReferralSummary {
                total: referrals.total,
                successful: referrals.successful,
                success_rate: percentage(referrals.successful, referrals.total),
            },
            recent_members: recent
                .into_iter()
                .map(|m| RecentMember {
                    profile_id: m.profile_id,
                    display_name: m.display_name,
                    join_date: m.join_date,
                })
                .collect(),
            generated_at: now,
            degraded: false,
        })
    }

    /// Member segmentation over fixed 30-day/7-day lookbacks from `now`,
    /// deliberately independent of the caller's window. The buckets are
    /// independent predicates and may overlap or miss members.
    async fn segmentation(
        &self,
        community_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<MemberSegmentation, SourceError> {
        let thirty_days_ago = now - Duration::days(30);
        let seven_days_ago = now - Duration::days(7);
        let last_30_days = DateRange::new(thirty_days_ago, now);

        let (total, new_members, active, participants, dormant) = tokio::try_join!(
            self.source.count_members_total(community_id),
            self.source
                .count_community_members_joined(community_id, last_30_days),
            self.source
                .count_members_active_since(community_id, seven_days_ago),
            self.source.count_event_participants(community_id),
            self.source
                .count_members_inactive_before(community_id, thirty_days_ago),
        )?;

        Ok(MemberSegmentation {
            total_members: total,
            new_members: bucket(new_members, total),
            active_members: bucket(active, total),
            event_participants: bucket(participants, total),
            dormant_members: bucket(dormant, total),
        })
    }

    /// Cohort retention anchored at the window start. A cohort is members
    /// who joined in `[window_start, now - lookback)`; retained means
    /// touched within the last `lookback` days. Empty or inverted cohort
    /// ranges (short windows) simply yield zero cohorts.
    async fn retention(
        &self,
        community_id: Uuid,
        window_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<RetentionAnalysis, SourceError> {
        let seven_days_ago = now - Duration::days(7);
        let thirty_days_ago = now - Duration::days(30);
        let day7_range = DateRange::new(window_start, seven_days_ago);
        let day30_range = DateRange::new(window_start, thirty_days_ago);

        let (day7_cohort, day7_retained, day30_cohort, day30_retained, churned) = tokio::try_join!(
            self.source.count_cohort(community_id, day7_range),
            self.source
                .count_cohort_retained(community_id, day7_range, seven_days_ago),
            self.source.count_cohort(community_id, day30_range),
            self.source
                .count_cohort_retained(community_id, day30_range, thirty_days_ago),
            // The source system labels this a churn rate; it is an
            // absolute count of members untouched for 30+ days.
            self.source
                .count_members_inactive_before(community_id, thirty_days_ago),
        )?;

        Ok(RetentionAnalysis {
            day7_cohort,
            day7_retained,
            day7_retention: percentage(day7_retained, day7_cohort),
            day30_cohort,
            day30_retained,
            day30_retention: percentage(day30_retained, day30_cohort),
            churned_member_count: churned,
        })
    }
}

fn bucket(count: i64, total: i64) -> SegmentBucket {
    SegmentBucket {
        count,
        percentage: percentage(count, total),
    }
}
