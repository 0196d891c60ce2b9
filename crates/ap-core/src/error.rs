//! Error type shared by the lower layers of the workspace.
//!
//! Upper crates wrap `CoreError` as one variant of their own enum via
//! `#[from]`, so `?` works across crate boundaries.

use thiserror::Error;

use crate::SimTime;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// Rejected at setup, before any event is scheduled.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("clock cannot move backwards from {now} to {requested}")]
    ClockRegression { now: SimTime, requested: SimTime },
}

/// Shorthand result type for `ap-core`.
pub type CoreResult<T> = Result<T, CoreError>;
