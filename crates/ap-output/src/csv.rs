//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `events.csv`
//! - `summary.csv`
//! - `servers.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use ap_stats::Report;

use crate::writer::OutputWriter;
use crate::{EventRow, OutputResult};

const SUMMARY_HEADER: [&str; 22] = [
    "seed",
    "end_time",
    "arrived",
    "arrived_high",
    "served",
    "served_high",
    "served_normal",
    "diverted",
    "diverted_high",
    "in_system_at_end",
    "delayed",
    "percent_delayed",
    "total_delay",
    "average_delay",
    "max_delay",
    "average_service_time",
    "average_utilization",
    "average_queue_length",
    "time_average_queue_length",
    "max_queue_length",
    "throughput",
    "percent_diverted",
];

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    events:   Writer<File>,
    summary:  Writer<File>,
    servers:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the three CSV files in it, and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(["time", "event", "entity", "location", "position"])?;

        let mut summary = Writer::from_path(dir.join("summary.csv"))?;
        summary.write_record(SUMMARY_HEADER)?;

        let mut servers = Writer::from_path(dir.join("servers.csv"))?;
        servers.write_record(["server", "busy_time", "services", "utilization"])?;

        Ok(Self { events, summary, servers, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.events.write_record(&[
            row.time.to_string(),
            row.event.to_owned(),
            row.entity.to_string(),
            row.location.to_string(),
            row.position.to_string(),
        ])?;
        Ok(())
    }

    fn write_report(&mut self, r: &Report) -> OutputResult<()> {
        self.summary.write_record(&[
            r.seed.to_string(),
            r.end_time.to_string(),
            r.arrived.to_string(),
            r.arrived_high.to_string(),
            r.served.to_string(),
            r.served_high.to_string(),
            r.served_normal.to_string(),
            r.diverted.to_string(),
            r.diverted_high.to_string(),
            r.in_system_at_end.to_string(),
            r.delayed.to_string(),
            r.percent_delayed.to_string(),
            r.total_delay.to_string(),
            r.average_delay.to_string(),
            r.max_delay.to_string(),
            r.average_service_time.to_string(),
            r.average_utilization.to_string(),
            r.average_queue_length.to_string(),
            r.time_average_queue_length.to_string(),
            r.max_queue_length.to_string(),
            r.throughput.to_string(),
            r.percent_diverted().to_string(),
        ])?;

        for (i, s) in r.servers.iter().enumerate() {
            self.servers.write_record(&[
                i.to_string(),
                s.busy_time.to_string(),
                s.services.to_string(),
                s.utilization.to_string(),
            ])?;
        }
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.events.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.summary.flush()?;
        self.servers.flush()?;
        Ok(())
    }
}
