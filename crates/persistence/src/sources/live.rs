//! Live `DataSource` backed by Postgres.
//!
//! Strictly read-only: every statement is a SELECT. "Members" always means
//! memberships with accepted status, never pending or rejected ones, and
//! precision-sensitive counts go to `community_members` rather than the
//! denormalized `communities.member_count` counter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::source::{
    CommunityRecord, DataSource, EventTally, JoinDay, MemberRecord, ReferralCounts, SourceError,
    StandingRecord,
};
use shared::window::DateRange;

use crate::entities::{
    CommunityEntity, EventStatsEntity, JoinDayEntity, RecentMemberEntity, ReferralCountsEntity,
    StandingEntity,
};

/// Postgres-backed data source.
#[derive(Clone)]
pub struct LiveSource {
    pool: PgPool,
}

impl LiveSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_err(err: sqlx::Error) -> SourceError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            SourceError::Unavailable(err.to_string())
        }
        other => SourceError::Query(other.to_string()),
    }
}

#[async_trait]
impl DataSource for LiveSource {
    async fn ping(&self) -> Result<(), SourceError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(map_err)
    }

    async fn count_communities_created(&self, range: DateRange) -> Result<i64, SourceError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM communities
            WHERE created_at >= $1 AND created_at < $2
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn count_members_joined(&self, range: DateRange) -> Result<i64, SourceError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM community_members
            WHERE status = 'accepted'
              AND join_date >= $1 AND join_date < $2
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn count_events_created(&self, range: DateRange) -> Result<i64, SourceError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM events
            WHERE is_deleted = false
              AND created_at >= $1 AND created_at < $2
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn count_active_communities(&self, range: DateRange) -> Result<i64, SourceError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT community_id)
            FROM community_members
            WHERE last_updated >= $1 AND last_updated < $2
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn top_communities_by_members(
        &self,
        limit: i64,
    ) -> Result<Vec<CommunityRecord>, SourceError> {
        let rows = sqlx::query_as::<_, CommunityEntity>(
            r#"
            SELECT id, name, avatar_url, member_count, created_at
            FROM communities
            ORDER BY member_count DESC, created_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_community_members_joined(
        &self,
        community_id: Uuid,
        range: DateRange,
    ) -> Result<i64, SourceError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM community_members
            WHERE community_id = $1
              AND status = 'accepted'
              AND join_date >= $2 AND join_date < $3
            "#,
        )
        .bind(community_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn count_community_events_created(
        &self,
        community_id: Uuid,
        range: DateRange,
    ) -> Result<i64, SourceError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM events e
            JOIN event_communities ec ON ec.event_id = e.id
            WHERE ec.community_id = $1
              AND e.is_deleted = false
              AND e.created_at >= $2 AND e.created_at < $3
            "#,
        )
        .bind(community_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn member_join_days(
        &self,
        community_id: Option<Uuid>,
        range: DateRange,
    ) -> Result<Vec<JoinDay>, SourceError> {
        // GROUP BY day yields no row for days without joins; the series
        // stays sparse by construction.
        let rows = sqlx::query_as::<_, JoinDayEntity>(
            r#"
            SELECT (join_date AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS joins
            FROM community_members
            WHERE status = 'accepted'
              AND join_date >= $1 AND join_date < $2
              AND ($3::uuid IS NULL OR community_id = $3)
            GROUP BY day
            ORDER BY day ASC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .bind(community_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn referral_outcomes(
        &self,
        community_id: Option<Uuid>,
        range: DateRange,
    ) -> Result<ReferralCounts, SourceError> {
        sqlx::query_as::<_, ReferralCountsEntity>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE successful) AS successful
            FROM referrals
            WHERE created_at >= $1 AND created_at < $2
              AND ($3::uuid IS NULL OR community_id = $3)
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .bind(community_id)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(map_err)
    }

    async fn find_community(&self, id: Uuid) -> Result<Option<CommunityRecord>, SourceError> {
        sqlx::query_as::<_, CommunityEntity>(
            r#"
            SELECT id, name, avatar_url, member_count, created_at
            FROM communities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Into::into))
        .map_err(map_err)
    }

    async fn community_event_stats(
        &self,
        community_id: Uuid,
        range: DateRange,
    ) -> Result<EventTally, SourceError> {
        sqlx::query_as::<_, EventStatsEntity>(
            r#"
            SELECT
                COUNT(DISTINCT e.id) AS total_events,
                COUNT(p.id) AS total_rsvps,
                COUNT(p.id) FILTER (WHERE p.status = 'attending') AS total_attending
            FROM events e
            JOIN event_communities ec ON ec.event_id = e.id
            LEFT JOIN event_participants p ON p.event_id = e.id
            WHERE ec.community_id = $1
              AND e.is_deleted = false
              AND e.created_at >= $2 AND e.created_at < $3
            "#,
        )
        .bind(community_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(map_err)
    }

    async fn count_members_total(&self, community_id: Uuid) -> Result<i64, SourceError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM community_members
            WHERE community_id = $1 AND status = 'accepted'
            "#,
        )
        .bind(community_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn count_members_active_since(
        &self,
        community_id: Uuid,
        instant: DateTime<Utc>,
    ) -> Result<i64, SourceError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM community_members
            WHERE community_id = $1
              AND status = 'accepted'
              AND last_updated >= $2
            "#,
        )
        .bind(community_id)
        .bind(instant)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn count_members_inactive_before(
        &self,
        community_id: Uuid,
        instant: DateTime<Utc>,
    ) -> Result<i64, SourceError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM community_members
            WHERE community_id = $1
              AND status = 'accepted'
              AND last_updated < $2
            "#,
        )
        .bind(community_id)
        .bind(instant)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn count_event_participants(&self, community_id: Uuid) -> Result<i64, SourceError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT m.profile_id)
            FROM community_members m
            WHERE m.community_id = $1
              AND m.status = 'accepted'
              AND EXISTS (
                  SELECT 1
                  FROM event_participants p
                  JOIN event_communities ec ON ec.event_id = p.event_id
                  WHERE p.profile_id = m.profile_id
                    AND ec.community_id = $1
              )
            "#,
        )
        .bind(community_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn count_cohort(
        &self,
        community_id: Uuid,
        joined: DateRange,
    ) -> Result<i64, SourceError> {
        // An inverted range matches no rows; short windows legitimately
        // produce empty cohorts.
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM community_members
            WHERE community_id = $1
              AND status = 'accepted'
              AND join_date >= $2 AND join_date < $3
            "#,
        )
        .bind(community_id)
        .bind(joined.start)
        .bind(joined.end)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn count_cohort_retained(
        &self,
        community_id: Uuid,
        joined: DateRange,
        active_since: DateTime<Utc>,
    ) -> Result<i64, SourceError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM community_members
            WHERE community_id = $1
              AND status = 'accepted'
              AND join_date >= $2 AND join_date < $3
              AND last_updated >= $4
            "#,
        )
        .bind(community_id)
        .bind(joined.start)
        .bind(joined.end)
        .bind(active_since)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn recent_members(
        &self,
        community_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MemberRecord>, SourceError> {
        let rows = sqlx::query_as::<_, RecentMemberEntity>(
            r#"
            SELECT m.profile_id, p.display_name, m.join_date
            FROM community_members m
            LEFT JOIN profiles p ON p.id = m.profile_id
            WHERE m.community_id = $1
              AND m.status = 'accepted'
            ORDER BY m.join_date DESC
            LIMIT $2
            "#,
        )
        .bind(community_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn leaderboard_roster(&self) -> Result<Vec<StandingRecord>, SourceError> {
        let rows = sqlx::query_as::<_, StandingEntity>(
            r#"
            SELECT
                c.id,
                c.name,
                c.member_count,
                (SELECT COUNT(*)
                 FROM event_communities ec
                 JOIN events e ON e.id = ec.event_id
                 WHERE ec.community_id = c.id AND e.is_deleted = false) AS events_created
            FROM communities c
            ORDER BY c.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
