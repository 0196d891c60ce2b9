//! `ap-output`: CSV output for airport simulation runs.
//!
//! | File           | Written by                         | One row per                 |
//! |----------------|------------------------------------|-----------------------------|
//! | `events.csv`   | [`EventLogObserver`] during a run  | model notification          |
//! | `summary.csv`  | [`OutputWriter::write_report`]     | run                         |
//! | `servers.csv`  | [`OutputWriter::write_report`]     | gate                        |
//!
//! # Usage
//!
//! ```rust,ignore
//! use ap_output::{CsvWriter, EventLogObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = EventLogObserver::new(writer);
//! let report = sim.run(&mut obs)?;
//! obs.write_report(&report)?;
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::EventLogObserver;
pub use row::{EventRow, NO_LOCATION};
pub use writer::OutputWriter;
