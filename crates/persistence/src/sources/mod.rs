//! `DataSource` implementations.
//!
//! `LiveSource` reads from Postgres; `SyntheticSource` serves a
//! deterministic in-memory dataset for local development and as the
//! documented fallback when the store is unreachable. The choice between
//! them is made once at startup, never per call.

pub mod live;
pub mod synthetic;

pub use live::LiveSource;
pub use synthetic::SyntheticSource;
