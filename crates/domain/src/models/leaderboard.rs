//! Leaderboard domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Lifetime counters for one community, as fetched from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CommunityStanding {
    pub id: Uuid,
    pub name: String,
    pub member_count: i64,
    pub events_created: i64,
}

impl CommunityStanding {
    /// `member_count * 0.7 + events_created * 100`, over lifetime counters.
    /// Same weights as the windowed growth score, but lifetime inputs.
    pub fn total_score(&self) -> f64 {
        self.member_count as f64 * 0.7 + self.events_created as f64 * 100.0
    }
}

/// Sort key for the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    MemberCount,
    EventsCreated,
    #[default]
    TotalScore,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query parameters for the leaderboard.
#[derive(Debug, Clone, Deserialize, Validate, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct LeaderboardQuery {
    /// Case-insensitive substring match on the display name.
    pub search: Option<String>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: Option<u32>,
}

impl LeaderboardQuery {
    /// The (filter, sort) part of the query. Pagination does not invalidate
    /// a memoized ranking, so page fields are excluded.
    pub fn ranking_key(&self) -> (Option<String>, SortField, SortOrder) {
        (
            self.search.clone(),
            self.sort.unwrap_or_default(),
            self.order.unwrap_or_default(),
        )
    }
}

/// One ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LeaderboardRow {
    /// 1-based position in the filtered and sorted sequence.
    pub rank: u32,
    pub id: Uuid,
    pub name: String,
    pub member_count: i64,
    pub events_created: i64,
    pub total_score: f64,
}

/// One page of the leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LeaderboardPage {
    pub rows: Vec<LeaderboardRow>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
    /// True when served from the synthetic fallback dataset.
    #[serde(default)]
    pub degraded: bool,
}
