//! `EventLogObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use ap_core::SimTime;
use ap_engine::{Notification, SimObserver};
use ap_stats::Report;

use crate::row::EventRow;
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that logs every model notification to an
/// [`OutputWriter`].
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After the run returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct EventLogObserver<W: OutputWriter> {
    writer:     W,
    rows:       u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> EventLogObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0, last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Event rows written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Write the final report and close the writer.
    pub fn write_report(&mut self, report: &Report) -> OutputResult<()> {
        self.writer.write_report(report)?;
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for EventLogObserver<W> {
    fn on_notification(&mut self, now: SimTime, notification: &Notification) {
        let row = EventRow::from_notification(now, notification);
        let result = self.writer.write_event(&row);
        if result.is_ok() {
            self.rows += 1;
        }
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _end: SimTime) {
        let result = self.writer.flush();
        self.store_err(result);
    }
}
