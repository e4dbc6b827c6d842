//! HTTP route handlers.

pub mod community;
pub mod health;
pub mod leaderboard;
pub mod platform;
