//! Platform-wide analytics domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::window::WindowCode;

/// A metric measured over the current window with its previous-window
/// counterpart. Ties count as positive.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WindowedMetric {
    pub current: i64,
    pub previous: i64,
    pub delta: i64,
    pub is_positive: bool,
}

/// Communities with membership activity inside the current window.
///
/// The percentage denominator is the count of communities *created* in the
/// current window, reproduced from the source system as observed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ActiveCommunities {
    pub count: i64,
    pub percentage: f64,
}

/// One entry in the top-growing list.
///
/// The list is ordered by lifetime `member_count`, not by `growth_score`;
/// the score is computed per entry but does not drive the ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GrowingCommunity {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub member_count: i64,
    pub new_members: i64,
    pub new_events: i64,
    /// `new_members * 0.7 + new_events * 100`, over windowed counts.
    pub growth_score: f64,
}

/// A single day of new accepted joins. Series of these are sparse: days
/// with zero joins are omitted, not zero-filled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GrowthPoint {
    pub date: NaiveDate,
    pub new_members: i64,
}

/// Referral outcomes over a window.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReferralStats {
    pub total: i64,
    pub successful: i64,
    pub success_rate: f64,
}

/// Cross-community overview for a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlatformAnalytics {
    pub window: WindowCode,
    pub total_communities: WindowedMetric,
    /// Join velocity: accepted joins per window, not a lifetime total.
    pub total_members: WindowedMetric,
    pub total_events: WindowedMetric,
    pub active_communities: ActiveCommunities,
    pub top_growing_communities: Vec<GrowingCommunity>,
    pub growth_series: Vec<GrowthPoint>,
    pub referrals: ReferralStats,
    pub generated_at: DateTime<Utc>,
    /// True when served from the synthetic fallback dataset.
    #[serde(default)]
    pub degraded: bool,
}
