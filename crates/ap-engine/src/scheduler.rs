//! The `Scheduler`: owns the clock and the event queue and drives a model.

use ap_core::{SimClock, SimTime};
use tracing::{debug, info, trace};

use crate::{Context, EngineError, EngineResult, Event, EventKind, EventQueue, SimObserver, SimulationModel};

/// Discrete-event loop.
///
/// Pops the earliest pending event, moves the clock to its timestamp, and
/// hands it to the model.  The clock only ever takes event timestamps, so it
/// is monotonically non-decreasing over a run.
#[derive(Default)]
pub struct Scheduler {
    queue:      EventQueue,
    clock:      SimClock,
    dispatched: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `kind` at `time`.  Used to seed the queue before `run`.
    pub fn schedule(&mut self, time: SimTime, kind: EventKind) -> Event {
        let event = self.queue.push(time, kind);
        trace!(%event, "scheduled");
        event
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// Events still waiting to be dispatched.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Events dispatched so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// Dispatch exactly one event.
    ///
    /// Returns `Ok(None)` if the queue is empty, otherwise the dispatched
    /// event.  Useful for tests and incremental stepping.
    pub fn step<M, O>(&mut self, model: &mut M, observer: &mut O) -> EngineResult<Option<Event>>
    where
        M: SimulationModel,
        O: SimObserver,
    {
        let Some(event) = self.queue.try_pop() else {
            return Ok(None);
        };
        self.clock.advance_to(event.time())?;
        self.dispatched += 1;

        debug!(
            now       = %event.time(),
            seq       = event.seq(),
            kind      = event.kind().label(),
            remaining = self.queue.len(),
            "dispatch"
        );

        observer.on_event(&event);
        let mut ctx = Context::new(self.clock.now(), &mut self.queue);
        model.handle_event(&event, &mut ctx, observer)?;
        Ok(Some(event))
    }

    /// Run until the model reports completion, then finalize it.
    ///
    /// The loop stops as soon as [`SimulationModel::is_complete`] holds after
    /// a dispatch; anything still queued at that point is discarded.  If the
    /// queue drains first, the model stopped scheduling work it still owes
    /// and the run fails with [`EngineError::Stalled`].
    pub fn run<M, O>(&mut self, model: &mut M, observer: &mut O) -> EngineResult<M::Report>
    where
        M: SimulationModel,
        O: SimObserver,
    {
        info!(pending = self.queue.len(), "run started");
        while !model.is_complete() {
            if self.step(model, observer)?.is_none() {
                return Err(EngineError::Stalled { at: self.now() });
            }
        }
        Ok(self.finish(model, observer))
    }

    /// Run until the queue is empty, ignoring the completion predicate.
    pub fn run_to_exhaustion<M, O>(&mut self, model: &mut M, observer: &mut O) -> EngineResult<M::Report>
    where
        M: SimulationModel,
        O: SimObserver,
    {
        info!(pending = self.queue.len(), "run started (until exhaustion)");
        while self.step(model, observer)?.is_some() {}
        Ok(self.finish(model, observer))
    }

    fn finish<M, O>(&mut self, model: &mut M, observer: &mut O) -> M::Report
    where
        M: SimulationModel,
        O: SimObserver,
    {
        let end = self.now();
        info!(
            end        = %end,
            dispatched = self.dispatched,
            discarded  = self.queue.len(),
            "run finished"
        );
        observer.on_sim_end(end);
        model.finalize(end)
    }
}
