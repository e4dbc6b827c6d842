//! Referral row mappings.

use sqlx::FromRow;

use domain::source::ReferralCounts;

/// Referral outcomes grouped over a window.
#[derive(Debug, Clone, FromRow)]
pub struct ReferralCountsEntity {
    pub total: i64,
    pub successful: i64,
}

impl From<ReferralCountsEntity> for ReferralCounts {
    fn from(entity: ReferralCountsEntity) -> Self {
        ReferralCounts {
            total: entity.total,
            successful: entity.successful,
        }
    }
}
