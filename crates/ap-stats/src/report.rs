//! The end-of-run report and its human-readable rendering.

use std::fmt;

use crate::ratio;

/// Per-gate figures.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerReport {
    pub busy_time:   f64,
    pub services:    u64,
    /// `busy_time / elapsed`.
    pub utilization: f64,
}

/// Final statistics of one run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Report {
    /// Seed the run used; replaying it reproduces this report.
    pub seed:     u64,
    pub end_time: f64,
    pub elapsed:  f64,

    pub arrived:          u64,
    pub arrived_high:     u64,
    pub served:           u64,
    pub served_high:      u64,
    pub served_normal:    u64,
    pub diverted:         u64,
    pub diverted_high:    u64,
    /// Entities still queued, held or in service when the run stopped
    /// (non-zero only when a time limit cut the run short).
    pub in_system_at_end: u64,

    /// Entities whose service started later than their arrival.
    pub delayed:                  u64,
    pub percent_delayed:          f64,
    pub total_delay:              f64,
    /// Mean delay over every entity that reached a gate.
    pub average_delay:            f64,
    /// Mean delay over delayed entities only.
    pub average_delay_of_delayed: f64,
    pub max_delay:                f64,
    pub average_service_time:     f64,

    pub servers:             Vec<ServerReport>,
    pub average_utilization: f64,

    /// Mean of the waiting count sampled at each state change.
    pub average_queue_length:      f64,
    /// Waiting count integrated over time, divided by elapsed time.
    pub time_average_queue_length: f64,
    pub max_queue_length:          usize,

    /// Served entities per unit of time.
    pub throughput: f64,
}

impl Report {
    /// Sum of gate busy time.
    pub fn total_busy_time(&self) -> f64 {
        self.servers.iter().map(|s| s.busy_time).sum()
    }

    /// Share of arrivals that were diverted, in percent.
    pub fn percent_diverted(&self) -> f64 {
        100.0 * ratio(self.diverted as f64, self.arrived as f64)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== AIRPORT SIMULATION REPORT ===")?;
        writeln!(f)?;
        writeln!(f, "1. Time")?;
        writeln!(f, "   - Simulation time:     {:.2}", self.end_time)?;
        writeln!(f, "   - Seed:                {}", self.seed)?;
        writeln!(f, "   - Throughput:          {:.3} planes/unit ({:.1} per 60 units)", self.throughput, self.throughput * 60.0)?;
        writeln!(f)?;
        writeln!(f, "2. Traffic")?;
        writeln!(f, "   - Arrived:             {} ({} high priority)", self.arrived, self.arrived_high)?;
        writeln!(f, "   - Served:              {} ({} high / {} normal)", self.served, self.served_high, self.served_normal)?;
        writeln!(f, "   - Diverted:            {} ({:.1}%, {} high priority)", self.diverted, self.percent_diverted(), self.diverted_high)?;
        if self.in_system_at_end > 0 {
            writeln!(f, "   - Still in system:     {}", self.in_system_at_end)?;
        }
        writeln!(f)?;
        writeln!(f, "3. Delay")?;
        writeln!(f, "   - Delayed planes:      {} ({:.1}%)", self.delayed, self.percent_delayed)?;
        writeln!(f, "   - Total delay:         {:.2}", self.total_delay)?;
        writeln!(f, "   - Average delay:       {:.2} (delayed only: {:.2})", self.average_delay, self.average_delay_of_delayed)?;
        writeln!(f, "   - Maximum delay:       {:.2}", self.max_delay)?;
        writeln!(f, "   - Average service:     {:.2}", self.average_service_time)?;
        writeln!(f)?;
        writeln!(f, "4. Gate utilization")?;
        for (i, s) in self.servers.iter().enumerate() {
            writeln!(f, "   - Gate {:<3}            {:>6.2}% ({} planes served)", i + 1, s.utilization * 100.0, s.services)?;
        }
        writeln!(f, "   - Average:             {:>6.2}%", self.average_utilization * 100.0)?;
        writeln!(f)?;
        writeln!(f, "5. Waiting area")?;
        writeln!(f, "   - Average length:      {:.2} (time-weighted {:.2})", self.average_queue_length, self.time_average_queue_length)?;
        writeln!(f, "   - Maximum length:      {}", self.max_queue_length)?;
        write!(f, "=================================")
    }
}
