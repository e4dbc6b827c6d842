//! Membership row mappings.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::source::{JoinDay, MemberRecord};

/// One day of a grouped-by-day join query. Days without joins produce no
/// row, so the fetched series is sparse.
#[derive(Debug, Clone, FromRow)]
pub struct JoinDayEntity {
    pub day: NaiveDate,
    pub joins: i64,
}

impl From<JoinDayEntity> for JoinDay {
    fn from(entity: JoinDayEntity) -> Self {
        JoinDay {
            day: entity.day,
            joins: entity.joins,
        }
    }
}

/// A recent accepted membership.
#[derive(Debug, Clone, FromRow)]
pub struct RecentMemberEntity {
    pub profile_id: Uuid,
    pub display_name: Option<String>,
    pub join_date: DateTime<Utc>,
}

impl From<RecentMemberEntity> for MemberRecord {
    fn from(entity: RecentMemberEntity) -> Self {
        MemberRecord {
            profile_id: entity.profile_id,
            display_name: entity.display_name,
            join_date: entity.join_date,
        }
    }
}
