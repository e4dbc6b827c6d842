//! Domain layer for the Community Pulse backend.
//!
//! This crate contains:
//! - Domain models (platform analytics, community analytics, leaderboard)
//! - The `DataSource` abstraction over the read-only store
//! - Aggregation services that turn raw counts into windowed metrics

pub mod models;
pub mod services;
pub mod source;
