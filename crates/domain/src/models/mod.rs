//! Domain models for the Community Pulse backend.

pub mod community;
pub mod leaderboard;
pub mod platform;

pub use community::{
    CommunityAnalytics, CommunitySummary, EventAnalytics, MemberGrowthPoint, MemberSegmentation,
    RecentMember, ReferralSummary, RetentionAnalysis, SegmentBucket,
};
pub use leaderboard::{
    CommunityStanding, LeaderboardPage, LeaderboardQuery, LeaderboardRow, SortField, SortOrder,
};
pub use platform::{
    ActiveCommunities, GrowingCommunity, GrowthPoint, PlatformAnalytics, ReferralStats,
    WindowedMetric,
};
