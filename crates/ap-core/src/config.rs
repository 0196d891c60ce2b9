//! Run configuration and its validation.
//!
//! Typically built in code or loaded from a JSON file by the runner, then
//! handed to the simulation builder, which calls
//! [`AirportConfig::validate`] before anything is scheduled.

use crate::{CoreError, CoreResult};

// ── WaitingConfig ─────────────────────────────────────────────────────────────

/// Which waiting discipline the run uses.  One variant per configuration;
/// the two are never mixed inside a run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum WaitingConfig {
    /// `count` parallel FIFO queues; arrivals join the shortest one.
    ///
    /// `capacity` bounds each queue (`None` = unbounded).  `count == 0`
    /// diverts every arrival that finds all gates busy.
    Queues {
        count:    usize,
        capacity: Option<usize>,
    },

    /// `slots` holding slots.  A held entity retries for a gate every
    /// `retry_interval` units; arrivals that find every slot taken are
    /// diverted.
    Holds {
        slots:          usize,
        retry_interval: f64,
    },
}

impl WaitingConfig {
    /// Total number of entities the waiting area can hold, `None` if
    /// unbounded.
    pub fn capacity(&self) -> Option<usize> {
        match *self {
            WaitingConfig::Queues { count, capacity } => capacity.map(|c| c * count),
            WaitingConfig::Holds { slots, .. } => Some(slots),
        }
    }

    /// `true` when no entity can ever wait (divert-immediately mode).
    pub fn diverts_immediately(&self) -> bool {
        self.capacity() == Some(0)
            || matches!(*self, WaitingConfig::Queues { count: 0, .. })
    }
}

impl Default for WaitingConfig {
    fn default() -> Self {
        WaitingConfig::Queues { count: 3, capacity: None }
    }
}

// ── AirportConfig ─────────────────────────────────────────────────────────────

/// Everything needed to set up one run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AirportConfig {
    /// Number of gates.
    pub servers: usize,

    /// Waiting discipline (parallel queues or hold slots).
    pub waiting: WaitingConfig,

    /// Mean of the exponential inter-arrival gap.
    pub mean_arrival_time: f64,

    /// Mean of the exponential service duration.
    pub mean_service_time: f64,

    /// How many arrivals the run generates in total.
    pub total_arrivals: u32,

    /// Probability that an arriving entity is high priority.
    pub high_priority_fraction: f64,

    /// Master seed.  `None` draws one from OS entropy; the report records
    /// the seed actually used.
    pub seed: Option<u64>,

    /// Time of the first arrival.
    pub warm_up: f64,

    /// Optional horizon: the run stops at this time even if entities are
    /// still in the system.
    pub time_limit: Option<f64>,

    /// Length of the observation vector offered to an external decision
    /// maker.
    pub observation_slots: usize,
}

impl Default for AirportConfig {
    fn default() -> Self {
        Self {
            servers:                5,
            waiting:                WaitingConfig::default(),
            mean_arrival_time:      1.0,
            mean_service_time:      3.0,
            total_arrivals:         10,
            high_priority_fraction: 0.2,
            seed:                   None,
            warm_up:                0.0,
            time_limit:             None,
            observation_slots:      20,
        }
    }
}

impl AirportConfig {
    /// Reject configurations that cannot describe a meaningful run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.servers == 0 {
            return invalid("servers must be at least 1");
        }
        if self.total_arrivals == 0 {
            return invalid("total_arrivals must be at least 1");
        }
        positive("mean_arrival_time", self.mean_arrival_time)?;
        positive("mean_service_time", self.mean_service_time)?;

        if !(0.0..=1.0).contains(&self.high_priority_fraction) {
            return invalid(format!(
                "high_priority_fraction must be within [0, 1], got {}",
                self.high_priority_fraction
            ));
        }
        if !self.warm_up.is_finite() || self.warm_up < 0.0 {
            return invalid(format!("warm_up must be finite and >= 0, got {}", self.warm_up));
        }
        if let Some(limit) = self.time_limit {
            positive("time_limit", limit)?;
        }
        if self.observation_slots == 0 {
            return invalid("observation_slots must be at least 1");
        }

        match self.waiting {
            WaitingConfig::Queues { capacity: Some(0), count } if count > 0 => {
                invalid("queue capacity must be at least 1 (use count = 0 to divert immediately)")
            }
            WaitingConfig::Holds { retry_interval, .. } => positive("retry_interval", retry_interval),
            _ => Ok(()),
        }
    }
}

fn positive(name: &str, value: f64) -> CoreResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        invalid(format!("{name} must be finite and > 0, got {value}"))
    }
}

fn invalid<T>(msg: impl Into<String>) -> CoreResult<T> {
    Err(CoreError::InvalidConfig(msg.into()))
}
