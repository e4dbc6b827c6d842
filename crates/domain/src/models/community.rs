//! Single-community analytics domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::window::WindowCode;

use super::platform::ReferralStats;

/// Identity card for the analyzed community.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CommunitySummary {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Denormalized lifetime counter; may drift from the accepted count.
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

/// One calendar day of new accepted joins. The series is sparse.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberGrowthPoint {
    pub date: NaiveDate,
    pub new_members: i64,
}

/// Event engagement over the window.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventAnalytics {
    pub total_events: i64,
    pub total_rsvps: i64,
    pub total_attending: i64,
    pub attendance_rate: f64,
    pub avg_rsvps_per_event: f64,
}

/// One segmentation bucket with its share of all members.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SegmentBucket {
    pub count: i64,
    pub percentage: f64,
}

/// Member segmentation over fixed 30-day/7-day lookbacks from now,
/// independent of the caller's chosen window.
///
/// The buckets are independent predicates: a member may fall in several
/// buckets or in none, and the counts do not sum to `total_members`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberSegmentation {
    pub total_members: i64,
    /// Joined within the last 30 days.
    pub new_members: SegmentBucket,
    /// Membership touched within the last 7 days.
    pub active_members: SegmentBucket,
    /// Ever participated in an event linked to this community.
    pub event_participants: SegmentBucket,
    /// Membership untouched for more than 30 days.
    pub dormant_members: SegmentBucket,
}

/// Cohort retention anchored at the caller's window start.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetentionAnalysis {
    pub day7_cohort: i64,
    pub day7_retained: i64,
    pub day7_retention: f64,
    pub day30_cohort: i64,
    pub day30_retained: i64,
    pub day30_retention: f64,
    /// Accepted members untouched for more than 30 days. The source system
    /// calls this a churn rate, but the value is an absolute count.
    pub churned_member_count: i64,
}

/// Referral outcomes for this community over the window.
pub type ReferralSummary = ReferralStats;

/// An accepted member, for the recent-joins list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RecentMember {
    pub profile_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub join_date: DateTime<Utc>,
}

/// Complete analytics response for one community.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CommunityAnalytics {
    pub window: WindowCode,
    pub community: CommunitySummary,
    pub member_growth: Vec<MemberGrowthPoint>,
    pub event_analytics: EventAnalytics,
    pub member_segmentation: MemberSegmentation,
    pub retention: RetentionAnalysis,
    pub referrals: ReferralSummary,
    pub recent_members: Vec<RecentMember>,
    pub generated_at: DateTime<Utc>,
    /// True when served from the synthetic fallback dataset.
    #[serde(default)]
    pub degraded: bool,
}
