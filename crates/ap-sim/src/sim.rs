//! `Sim<D>`: a built simulation ready to run.

use ap_core::SimTime;
use ap_engine::{Event, Scheduler, SimObserver, SimulationModel};
use ap_model::{AirportModel, DecisionMaker, NoDecision};
use ap_stats::Report;

use crate::SimResult;

/// One run: the scheduler and the model it drives.
///
/// Nothing is shared with other runs, so any number of `Sim`s can run side
/// by side.  Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<D: DecisionMaker = NoDecision> {
    /// Clock and pending events.
    pub scheduler: Scheduler,

    /// Gates, waiting area, entities and statistics.
    pub model: AirportModel<D>,
}

impl<D: DecisionMaker> Sim<D> {
    /// Run until every arrival has been served or diverted (or the time
    /// limit is reached) and return the report.
    ///
    /// Use [`NoopObserver`][ap_engine::NoopObserver] if you don't need
    /// callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Report> {
        Ok(self.scheduler.run(&mut self.model, observer)?)
    }

    /// Dispatch one event.  `Ok(None)` once the queue is empty.
    ///
    /// Useful for tests and incremental stepping; call [`run`](Self::run)
    /// afterwards to obtain the report.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Option<Event>> {
        Ok(self.scheduler.step(&mut self.model, observer)?)
    }

    pub fn is_complete(&self) -> bool {
        self.model.is_complete()
    }

    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    /// Seed the run uses; replaying it reproduces the run.
    pub fn seed(&self) -> u64 {
        self.model.seed()
    }
}
