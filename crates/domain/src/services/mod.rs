//! Aggregation services.
//!
//! Services own the arithmetic: they fan out independent reads through the
//! injected `DataSource`, join the results, and assemble response models.
//! They hold no mutable shared state and never write to the store.

pub mod community;
pub mod leaderboard;
pub mod platform;

use thiserror::Error;
use uuid::Uuid;

use crate::source::SourceError;

pub use community::CommunityAnalyticsService;
pub use leaderboard::{paginate, rank_standings, Leaderboard, DEFAULT_PAGE_SIZE};
pub use platform::PlatformAnalyticsService;

/// Failure surface of an aggregation call.
///
/// An unknown community id is a distinct, non-retriable result; source
/// failures bubble up unchanged so the transport layer can map them to a
/// degraded/unavailable response. Nothing in here is retried.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("community not found: {0}")]
    CommunityNotFound(Uuid),

    #[error(transparent)]
    Source(#[from] SourceError),
}
