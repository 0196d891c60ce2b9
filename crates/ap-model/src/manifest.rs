//! Pre-planned arrivals.
//!
//! By default arrivals are drawn from the variate generator.  A manifest
//! replaces those draws with a fixed list of planes, each with its own
//! arrival time, priority and service time.  Useful for replaying recorded
//! traffic and for constructing exact scenarios in tests.
//!
//! # CSV format
//!
//! ```csv
//! arrival_time,priority,service_time
//! 0.0,normal,5.0
//! 1.5,high,2.0
//! 2.0,1,4.0
//! ```
//!
//! **`priority`** accepts `normal`/`high` or `0`/`1`.  Rows must be in
//! non-decreasing `arrival_time` order.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ap_core::Priority;

use crate::{ModelError, ModelResult};

/// One planned plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedArrival {
    pub time:         f64,
    pub priority:     Priority,
    pub service_time: f64,
}

/// Validated, time-ordered list of planned arrivals.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalManifest {
    arrivals: Vec<PlannedArrival>,
}

impl ArrivalManifest {
    /// Validate and wrap `arrivals`.  Rejects an empty list, negative or
    /// non-finite times, non-positive service times, and out-of-order rows.
    pub fn new(arrivals: Vec<PlannedArrival>) -> ModelResult<Self> {
        if arrivals.is_empty() {
            return Err(ModelError::Manifest("manifest has no arrivals".into()));
        }
        let mut last = 0.0_f64;
        for (row, a) in arrivals.iter().enumerate() {
            if !a.time.is_finite() || a.time < last {
                return Err(ModelError::Manifest(format!(
                    "row {row}: arrival_time {} must be finite and >= {last}",
                    a.time
                )));
            }
            if !a.service_time.is_finite() || a.service_time <= 0.0 {
                return Err(ModelError::Manifest(format!(
                    "row {row}: service_time {} must be finite and > 0",
                    a.service_time
                )));
            }
            last = a.time;
        }
        Ok(Self { arrivals })
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlannedArrival> {
        self.arrivals.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlannedArrival> {
        self.arrivals.iter()
    }
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ManifestRecord {
    arrival_time: f64,
    priority:     String,
    service_time: f64,
}

/// Load an [`ArrivalManifest`] from a CSV file.
pub fn load_manifest_csv(path: &Path) -> ModelResult<ArrivalManifest> {
    let file = std::fs::File::open(path)?;
    load_manifest_reader(file)
}

/// Like [`load_manifest_csv`] but accepts any `Read` source.
pub fn load_manifest_reader<R: Read>(reader: R) -> ModelResult<ArrivalManifest> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let arrivals = csv_reader
        .deserialize::<ManifestRecord>()
        .map(|row| {
            let row = row.map_err(|e| ModelError::Manifest(e.to_string()))?;
            Ok(PlannedArrival {
                time:         row.arrival_time,
                priority:     parse_priority(&row.priority)?,
                service_time: row.service_time,
            })
        })
        .collect::<ModelResult<Vec<_>>>()?;
    ArrivalManifest::new(arrivals)
}

fn parse_priority(s: &str) -> ModelResult<Priority> {
    match s.trim() {
        "normal" | "0" => Ok(Priority::Normal),
        "high" | "1" => Ok(Priority::High),
        other => Err(ModelError::Manifest(format!(
            "invalid priority {other:?}: expected \"normal\", \"high\", 0 or 1"
        ))),
    }
}
