//! The `OutputWriter` trait implemented by output backends.

use ap_stats::Report;

use crate::{EventRow, OutputResult};

/// A sink for one run's output.
///
/// Used through [`EventLogObserver`](crate::EventLogObserver), which keeps
/// the first error from the event stream for
/// [`take_error`](crate::EventLogObserver::take_error).
pub trait OutputWriter {
    /// Append one notification row.
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()>;

    /// Write the end-of-run report (summary and per-gate rows).
    fn write_report(&mut self, report: &Report) -> OutputResult<()>;

    /// Flush buffered rows without closing anything.
    fn flush(&mut self) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
