//! Persistence layer for the Community Pulse backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - The two `DataSource` implementations: live (Postgres) and synthetic

pub mod db;
pub mod entities;
pub mod sources;
