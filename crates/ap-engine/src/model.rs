//! The `SimulationModel` trait: the extension point the scheduler drives.

use ap_core::SimTime;

use crate::{EngineResult, Event, EventKind, EventQueue, SimObserver};

/// Handle given to a model while it processes one event.
///
/// Exposes the current time and lets the handler schedule future events.
/// Nothing can be scheduled in the past: requests earlier than `now` are
/// clamped to `now`, so the clock never has to move backwards.
pub struct Context<'a> {
    now:   SimTime,
    queue: &'a mut EventQueue,
}

impl<'a> Context<'a> {
    #[inline]
    pub fn new(now: SimTime, queue: &'a mut EventQueue) -> Self {
        Self { now, queue }
    }

    /// The time of the event being handled.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule `kind` at absolute `time`.
    pub fn schedule_at(&mut self, time: SimTime, kind: EventKind) -> Event {
        debug_assert!(time >= self.now, "scheduling {kind:?} in the past: {time} < {}", self.now);
        self.queue.push(time.max(self.now), kind)
    }

    /// Schedule `kind` `delay` units from now.
    pub fn schedule_in(&mut self, delay: f64, kind: EventKind) -> Event {
        self.schedule_at(self.now.after(delay.max(0.0)), kind)
    }

    /// Number of events still pending (not counting the one being handled).
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// A simulation the [`Scheduler`](crate::Scheduler) can drive.
///
/// Handlers run to completion, one at a time, in timestamp order; no two
/// events are ever processed concurrently, so implementations need no
/// locking around their state.
///
/// # Example
///
/// ```rust,ignore
/// struct Counter { seen: u32 }
///
/// impl SimulationModel for Counter {
///     type Report = u32;
///
///     fn handle_event<O: SimObserver>(&mut self, event: &Event, ctx: &mut Context<'_>, _: &mut O)
///         -> EngineResult<()>
///     {
///         self.seen += 1;
///         if self.seen < 3 {
///             ctx.schedule_in(1.0, EventKind::Arrival);
///         }
///         Ok(())
///     }
///
///     fn is_complete(&self) -> bool { self.seen >= 3 }
///     fn finalize(&mut self, _end: SimTime) -> u32 { self.seen }
/// }
/// ```
pub trait SimulationModel {
    /// What [`finalize`](Self::finalize) produces.
    type Report;

    /// Process one event.  `ctx.now()` already equals `event.time()`.
    ///
    /// Notifications about assignment decisions go to `observer`; they are
    /// fire-and-forget and must not influence the model's state.
    fn handle_event<O: SimObserver>(
        &mut self,
        event:    &Event,
        ctx:      &mut Context<'_>,
        observer: &mut O,
    ) -> EngineResult<()>;

    /// `true` once the model has no more work.  Checked after every event.
    fn is_complete(&self) -> bool;

    /// Produce the final report.  Called once, with the clock at the time of
    /// the last dispatched event.
    fn finalize(&mut self, end: SimTime) -> Self::Report;
}
