//! Read-only data access abstraction.
//!
//! The aggregation services never touch a store directly; they are handed a
//! `DataSource` once at startup. The live implementation runs SQL against
//! Postgres, the synthetic implementation serves a deterministic in-memory
//! dataset and marks every response as degraded. Nothing here mutates state.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use shared::window::DateRange;

/// Error surface of a data source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The store could not be reached or did not answer within budget.
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    /// The store answered with a failure.
    #[error("data source query failed: {0}")]
    Query(String),
}

/// A community row as the aggregators see it.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityRecord {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
    /// Denormalized lifetime counter; may drift from the true accepted
    /// membership count, so precision-sensitive queries count memberships.
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

/// One calendar day of new accepted joins. Days with zero joins are never
/// materialized, so a series of these is sparse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinDay {
    pub day: NaiveDate,
    pub joins: i64,
}

/// Participant totals over a set of events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventTally {
    pub total_events: i64,
    pub total_rsvps: i64,
    pub total_attending: i64,
}

/// Referral outcomes grouped over a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferralCounts {
    pub total: i64,
    pub successful: i64,
}

/// An accepted membership, newest-join ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRecord {
    pub profile_id: Uuid,
    pub display_name: Option<String>,
    pub join_date: DateTime<Utc>,
}

/// Lifetime counters for one leaderboard row.
#[derive(Debug, Clone, PartialEq)]
pub struct StandingRecord {
    pub id: Uuid,
    pub name: String,
    pub member_count: i64,
    pub events_created: i64,
}

/// Read-only counts, group-bys, and filtered fetches against the community
/// store. "Members" always means memberships with accepted status.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Cheap connectivity probe for health checks.
    async fn ping(&self) -> Result<(), SourceError>;

    // Platform-wide

    /// Communities whose creation timestamp falls in the range.
    async fn count_communities_created(&self, range: DateRange) -> Result<i64, SourceError>;

    /// Accepted memberships whose join date falls in the range.
    async fn count_members_joined(&self, range: DateRange) -> Result<i64, SourceError>;

    /// Non-deleted events created in the range.
    async fn count_events_created(&self, range: DateRange) -> Result<i64, SourceError>;

    /// Communities with at least one membership touched in the range.
    async fn count_active_communities(&self, range: DateRange) -> Result<i64, SourceError>;

    /// The largest communities by lifetime member counter, descending.
    async fn top_communities_by_members(
        &self,
        limit: i64,
    ) -> Result<Vec<CommunityRecord>, SourceError>;

    /// Accepted joins for one community in the range.
    async fn count_community_members_joined(
        &self,
        community_id: Uuid,
        range: DateRange,
    ) -> Result<i64, SourceError>;

    /// Non-deleted events linked to one community and created in the range.
    async fn count_community_events_created(
        &self,
        community_id: Uuid,
        range: DateRange,
    ) -> Result<i64, SourceError>;

    /// Sparse per-day accepted join counts, chronological. `community_id`
    /// of `None` means platform-wide.
    async fn member_join_days(
        &self,
        community_id: Option<Uuid>,
        range: DateRange,
    ) -> Result<Vec<JoinDay>, SourceError>;

    /// Referrals created in the range, grouped by outcome. `community_id`
    /// of `None` means platform-wide.
    async fn referral_outcomes(
        &self,
        community_id: Option<Uuid>,
        range: DateRange,
    ) -> Result<ReferralCounts, SourceError>;

    // Single community

    async fn find_community(&self, id: Uuid) -> Result<Option<CommunityRecord>, SourceError>;

    /// Participant totals over linked non-deleted events created in range.
    async fn community_event_stats(
        &self,
        community_id: Uuid,
        range: DateRange,
    ) -> Result<EventTally, SourceError>;

    /// All-time accepted memberships.
    async fn count_members_total(&self, community_id: Uuid) -> Result<i64, SourceError>;

    /// Accepted memberships with `last_updated >= instant`.
    async fn count_members_active_since(
        &self,
        community_id: Uuid,
        instant: DateTime<Utc>,
    ) -> Result<i64, SourceError>;

    /// Accepted memberships with `last_updated < instant`.
    async fn count_members_inactive_before(
        &self,
        community_id: Uuid,
        instant: DateTime<Utc>,
    ) -> Result<i64, SourceError>;

    /// Accepted memberships whose profile has ever participated in any
    /// event linked to this community.
    async fn count_event_participants(&self, community_id: Uuid) -> Result<i64, SourceError>;

    /// Accepted memberships that joined inside `joined` (a retention cohort).
    async fn count_cohort(
        &self,
        community_id: Uuid,
        joined: DateRange,
    ) -> Result<i64, SourceError>;

    /// Cohort members still showing activity (`last_updated >= active_since`).
    async fn count_cohort_retained(
        &self,
        community_id: Uuid,
        joined: DateRange,
        active_since: DateTime<Utc>,
    ) -> Result<i64, SourceError>;

    /// Up to `limit` accepted memberships, most recent join first.
    async fn recent_members(
        &self,
        community_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MemberRecord>, SourceError>;

    // Leaderboard

    /// Lifetime counters for every community.
    async fn leaderboard_roster(&self) -> Result<Vec<StandingRecord>, SourceError>;
}
