//! Time-window arithmetic for period-over-period comparison.
//!
//! A window code selects a lookback length; the comparator derives the
//! current window and the previous window of equal duration immediately
//! before it. Every aggregation in the system works over these two ranges.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Coarse lookback length accepted by the analytics endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WindowCode {
    #[serde(rename = "7d")]
    Days7,
    #[default]
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "90d")]
    Days90,
}

impl WindowCode {
    /// Parses a range code. Unrecognized codes fall back to 30 days;
    /// callers never see a parse error.
    pub fn parse(code: &str) -> Self {
        match code {
            "7d" => WindowCode::Days7,
            "90d" => WindowCode::Days90,
            _ => WindowCode::Days30,
        }
    }

    pub fn days_back(self) -> i64 {
        match self {
            WindowCode::Days7 => 7,
            WindowCode::Days30 => 30,
            WindowCode::Days90 => 90,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WindowCode::Days7 => "7d",
            WindowCode::Days30 => "30d",
            WindowCode::Days90 => "90d",
        }
    }
}

impl std::fmt::Display for WindowCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Half-open instant range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// The current window and the previous window of equal duration.
///
/// Invariant: the windows are contiguous and non-overlapping, so
/// `current.start - previous.start == now - current.start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonWindows {
    pub code: WindowCode,
    pub now: DateTime<Utc>,
    pub current: DateRange,
    pub previous: DateRange,
}

impl ComparisonWindows {
    pub fn new(code: WindowCode, now: DateTime<Utc>) -> Self {
        let span = Duration::days(code.days_back());
        let current_start = now - span;
        let previous_start = current_start - span;
        Self {
            code,
            now,
            current: DateRange::new(current_start, now),
            previous: DateRange::new(previous_start, current_start),
        }
    }
}

/// Before/after delta for a single metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Comparison {
    pub delta: i64,
    pub is_positive: bool,
}

/// Compares a current-window value against the previous window.
/// Ties count as positive.
pub fn compare(current: i64, previous: i64) -> Comparison {
    Comparison {
        delta: current - previous,
        is_positive: current >= previous,
    }
}
