//! Community row mappings.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::source::{CommunityRecord, StandingRecord};

/// A row from the `communities` table.
#[derive(Debug, Clone, FromRow)]
pub struct CommunityEntity {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<CommunityEntity> for CommunityRecord {
    fn from(entity: CommunityEntity) -> Self {
        CommunityRecord {
            id: entity.id,
            name: entity.name,
            avatar_url: entity.avatar_url,
            member_count: entity.member_count,
            created_at: entity.created_at,
        }
    }
}

/// A leaderboard roster row: lifetime counters per community.
#[derive(Debug, Clone, FromRow)]
pub struct StandingEntity {
    pub id: Uuid,
    pub name: String,
    pub member_count: i64,
    pub events_created: i64,
}

impl From<StandingEntity> for StandingRecord {
    fn from(entity: StandingEntity) -> Self {
        StandingRecord {
            id: entity.id,
            name: entity.name,
            member_count: entity.member_count,
            events_created: entity.events_created,
        }
    }
}
