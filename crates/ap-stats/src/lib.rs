//! `ap-stats`: running counters and the end-of-run report.
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`collector`] | `StatisticsCollector`: O(servers) running sums           |
//! | [`report`]    | `Report`, `ServerReport`, human-readable `Display`        |
//!
//! Every figure in the report is derived from accumulated counters; the
//! collector never keeps per-entity history.  Divisions with a zero
//! denominator yield `0`.

pub mod collector;
pub mod report;


pub use collector::StatisticsCollector;
pub use report::{Report, ServerReport};

/// `num / den`, or `0` when `den` is zero.
#[inline]
pub(crate) fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}
