//! Shared utilities for the Community Pulse backend.
//!
//! This crate contains:
//! - Time-window arithmetic for period-over-period comparison
//! - Division helpers guarded against empty denominators

pub mod math;
pub mod window;
