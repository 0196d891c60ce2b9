//! Batch experiments: one configuration, many independent replications.
//!
//! Replication `k` runs with seed `base + k`, where `base` is the
//! configured seed (or one drawn from OS entropy).  Each replication builds
//! its own [`Sim`](crate::Sim), so runs never share state and the results
//! are identical whether or not the `parallel` feature is enabled.

use ap_core::{AirportConfig, CoreError, VariateGenerator};
use ap_engine::NoopObserver;
use ap_stats::Report;
use tracing::info;

use crate::{SimBuilder, SimResult};

/// Mean, minimum and maximum of one figure across replications.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spread {
    pub mean: f64,
    pub min:  f64,
    pub max:  f64,
}

impl Spread {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        let mut n = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            n += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        if n == 0 {
            return Self::default();
        }
        Self { mean: sum / n as f64, min, max }
    }
}

/// Reports of every replication plus summary spreads.
#[derive(Clone, Debug)]
pub struct BatchSummary {
    pub base_seed:     u64,
    /// One report per replication, in seed order.
    pub runs:          Vec<Report>,
    pub average_delay: Spread,
    pub utilization:   Spread,
    pub diverted:      Spread,
    pub throughput:    Spread,
}

impl BatchSummary {
    fn from_runs(base_seed: u64, runs: Vec<Report>) -> Self {
        Self {
            base_seed,
            average_delay: Spread::of(runs.iter().map(|r| r.average_delay)),
            utilization:   Spread::of(runs.iter().map(|r| r.average_utilization)),
            diverted:      Spread::of(runs.iter().map(|r| r.diverted as f64)),
            throughput:    Spread::of(runs.iter().map(|r| r.throughput)),
            runs,
        }
    }
}

/// Run `replications` independent copies of `config`.
pub fn run_batch(config: &AirportConfig, replications: usize) -> SimResult<BatchSummary> {
    if replications == 0 {
        return Err(CoreError::InvalidConfig("replications must be at least 1".into()).into());
    }
    config.validate()?;

    let base_seed = config.seed.unwrap_or_else(|| VariateGenerator::from_entropy().seed());
    let seeds: Vec<u64> = (0..replications as u64).map(|k| base_seed.wrapping_add(k)).collect();
    info!(base_seed, replications, "batch started");

    #[cfg(not(feature = "parallel"))]
    let runs = seeds
        .iter()
        .map(|&seed| run_one(config, seed))
        .collect::<SimResult<Vec<_>>>()?;

    #[cfg(feature = "parallel")]
    let runs = {
        use rayon::prelude::*;

        seeds
            .par_iter()
            .map(|&seed| run_one(config, seed))
            .collect::<SimResult<Vec<_>>>()?
    };

    let summary = BatchSummary::from_runs(base_seed, runs);
    info!(
        mean_delay       = summary.average_delay.mean,
        mean_utilization = summary.utilization.mean,
        mean_diverted    = summary.diverted.mean,
        "batch finished"
    );
    Ok(summary)
}

fn run_one(config: &AirportConfig, seed: u64) -> SimResult<Report> {
    let mut sim = SimBuilder::new(config.clone()).seed(seed).build()?;
    sim.run(&mut NoopObserver)
}
