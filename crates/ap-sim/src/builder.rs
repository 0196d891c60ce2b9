//! Fluent builder for constructing a [`Sim`].

use ap_core::{AirportConfig, SimTime, VariateGenerator};
use ap_engine::{EventKind, Scheduler};
use ap_model::{AirportModel, ArrivalManifest, DecisionMaker, NoDecision};
use tracing::info;

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim<D>`].
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                                  |
/// |------------------------|------------------------------------------|
/// | `.decision_maker(d)`   | `NoDecision` (default policy only)       |
/// | `.arrivals(m)`         | arrivals drawn from the generator        |
/// | `.seed(s)`             | `config.seed`, else OS entropy           |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .decision_maker(FirstWaiting)
///     .seed(7)
///     .build()?;
/// let report = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<D: DecisionMaker = NoDecision> {
    config:   AirportConfig,
    decision: D,
    arrivals: Option<ArrivalManifest>,
}

impl SimBuilder<NoDecision> {
    pub fn new(config: AirportConfig) -> Self {
        Self { config, decision: NoDecision, arrivals: None }
    }
}

impl<D: DecisionMaker> SimBuilder<D> {
    /// Delegate "who is served next" to `decision`.  Invalid answers fall
    /// back to the default policy.
    pub fn decision_maker<E: DecisionMaker>(self, decision: E) -> SimBuilder<E> {
        SimBuilder { config: self.config, decision, arrivals: self.arrivals }
    }

    /// Replay pre-planned arrivals instead of drawing them.
    pub fn arrivals(mut self, manifest: ArrivalManifest) -> Self {
        self.arrivals = Some(manifest);
        self
    }

    /// Override the configured seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validate the configuration, seed the generator, set up the model, and
    /// queue the `Start` event.
    pub fn build(self) -> SimResult<Sim<D>> {
        self.config.validate()?;

        let rng = match self.config.seed {
            Some(seed) => VariateGenerator::new(seed),
            None => VariateGenerator::from_entropy(),
        };
        info!(
            seed     = rng.seed(),
            servers  = self.config.servers,
            arrivals = self.arrivals.as_ref().map_or(self.config.total_arrivals as usize, ArrivalManifest::len),
            manifest = self.arrivals.is_some(),
            "simulation built"
        );

        let mut model = AirportModel::new(self.config, rng, self.decision)?;
        if let Some(manifest) = self.arrivals {
            model = model.with_arrivals(manifest);
        }

        let mut scheduler = Scheduler::new();
        scheduler.schedule(SimTime::ZERO, EventKind::Start);

        Ok(Sim { scheduler, model })
    }
}
