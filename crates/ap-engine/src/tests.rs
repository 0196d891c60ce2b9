//! Unit tests for ap-engine.

use ap_core::{EntityId, ServerId, SimTime, VariateGenerator};

use crate::{
    Context, EngineError, EngineResult, Event, EventKind, EventQueue, NoopObserver, Scheduler,
    SimObserver, SimulationModel,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn complete(entity: u32) -> EventKind {
    EventKind::ServiceComplete { entity: EntityId(entity), server: ServerId(0) }
}

/// Model that re-arms itself `budget` times with a fixed gap, recording the
/// times it observed.
struct Ticker {
    gap:    f64,
    budget: u32,
    seen:   Vec<SimTime>,
}

impl Ticker {
    fn new(gap: f64, budget: u32) -> Self {
        Self { gap, budget, seen: Vec::new() }
    }
}

impl SimulationModel for Ticker {
    type Report = Vec<SimTime>;

    fn handle_event<O: SimObserver>(
        &mut self,
        event: &Event,
        ctx:   &mut Context<'_>,
        _obs:  &mut O,
    ) -> EngineResult<()> {
        assert_eq!(ctx.now(), event.time(), "clock must equal the event time");
        self.seen.push(ctx.now());
        if (self.seen.len() as u32) < self.budget {
            ctx.schedule_in(self.gap, EventKind::Arrival);
        }
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.seen.len() as u32 >= self.budget
    }

    fn finalize(&mut self, _end: SimTime) -> Vec<SimTime> {
        std::mem::take(&mut self.seen)
    }
}

/// Records every dispatched event.
#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
    ended:  Option<SimTime>,
}

impl SimObserver for Recorder {
    fn on_event(&mut self, event: &Event) {
        self.events.push(*event);
    }

    fn on_sim_end(&mut self, end: SimTime) {
        self.ended = Some(end);
    }
}

// ── EventQueue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use super::*;

    #[test]
    fn pops_in_time_order() {
        let mut q = EventQueue::new();
        for t in [5.0, 1.0, 3.0, 0.5, 4.0] {
            q.push(SimTime(t), EventKind::Arrival);
        }
        let times: Vec<f64> = std::iter::from_fn(|| q.try_pop()).map(|e| e.time().0).collect();
        assert_eq!(times, vec![0.5, 1.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn equal_times_pop_in_insertion_order() {
        let mut q = EventQueue::new();
        q.push(SimTime(2.0), complete(0));
        q.push(SimTime(1.0), EventKind::Start);
        q.push(SimTime(2.0), complete(1));
        q.push(SimTime(2.0), complete(2));
        q.push(SimTime(2.0), EventKind::End);

        assert_eq!(q.pop().unwrap().kind(), EventKind::Start);
        assert_eq!(q.pop().unwrap().kind(), complete(0));
        assert_eq!(q.pop().unwrap().kind(), complete(1));
        assert_eq!(q.pop().unwrap().kind(), complete(2));
        assert_eq!(q.pop().unwrap().kind(), EventKind::End);
    }

    #[test]
    fn interleaved_push_pop_stays_stable() {
        let mut q = EventQueue::new();
        q.push(SimTime(1.0), complete(0));
        q.push(SimTime(1.0), complete(1));
        assert_eq!(q.pop().unwrap().kind(), complete(0));
        q.push(SimTime(1.0), complete(2));
        assert_eq!(q.pop().unwrap().kind(), complete(1));
        assert_eq!(q.pop().unwrap().kind(), complete(2));
    }

    #[test]
    fn empty_pop_fails() {
        let mut q = EventQueue::new();
        assert!(matches!(q.pop(), Err(EngineError::EmptyQueue)));
        assert!(q.try_pop().is_none());
        assert!(q.peek().is_none());
    }

    #[test]
    fn peek_and_len() {
        let mut q = EventQueue::new();
        assert!(q.is_empty());
        q.push(SimTime(3.0), EventKind::Arrival);
        q.push(SimTime(2.0), EventKind::End);
        assert_eq!(q.len(), 2);
        assert_eq!(q.peek().unwrap().kind(), EventKind::End);
        assert_eq!(q.next_time(), Some(SimTime(2.0)));
        assert_eq!(q.len(), 2, "peek must not remove");
        assert_eq!(q.pushed(), 2);
    }

    #[test]
    fn seq_is_assigned_on_push() {
        let mut q = EventQueue::new();
        let a = q.push(SimTime(0.0), EventKind::Start);
        let b = q.push(SimTime(0.0), EventKind::Arrival);
        assert_eq!(a.seq(), 0);
        assert_eq!(b.seq(), 1);
    }

    #[test]
    fn many_random_times_are_sorted_and_stable() {
        // Times drawn from a small set so ties are frequent.
        let mut q = EventQueue::new();
        let mut rng = VariateGenerator::new(3);
        for _ in 0..500 {
            q.push(SimTime(rng.uniform(0.0, 7.0).floor()), EventKind::Arrival);
        }
        let popped: Vec<Event> = std::iter::from_fn(|| q.try_pop()).collect();
        for pair in popped.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(a.time() <= b.time());
            if a.time() == b.time() {
                assert!(a.seq() < b.seq(), "tie broken out of insertion order");
            }
        }
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler {
    use super::*;

    #[test]
    fn runs_until_complete() {
        let mut sched = Scheduler::new();
        sched.schedule(SimTime::ZERO, EventKind::Start);
        let mut model = Ticker::new(1.5, 4);
        let seen = sched.run(&mut model, &mut NoopObserver).unwrap();
        assert_eq!(seen, vec![SimTime(0.0), SimTime(1.5), SimTime(3.0), SimTime(4.5)]);
        assert_eq!(sched.now(), SimTime(4.5));
        assert_eq!(sched.dispatched(), 4);
    }

    #[test]
    fn stops_at_completion_and_discards_leftovers() {
        let mut sched = Scheduler::new();
        sched.schedule(SimTime::ZERO, EventKind::Start);
        sched.schedule(SimTime(100.0), EventKind::End);
        let mut model = Ticker::new(1.0, 2);
        let seen = sched.run(&mut model, &mut NoopObserver).unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(sched.now(), SimTime(1.0));
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn stalls_when_model_stops_scheduling() {
        struct Lazy;
        impl SimulationModel for Lazy {
            type Report = ();
            fn handle_event<O: SimObserver>(&mut self, _: &Event, _: &mut Context<'_>, _: &mut O) -> EngineResult<()> {
                Ok(())
            }
            fn is_complete(&self) -> bool {
                false
            }
            fn finalize(&mut self, _: SimTime) {}
        }

        let mut sched = Scheduler::new();
        sched.schedule(SimTime(2.0), EventKind::Start);
        let err = sched.run(&mut Lazy, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, EngineError::Stalled { at } if at == SimTime(2.0)));
    }

    #[test]
    fn run_to_exhaustion_ignores_predicate() {
        let mut sched = Scheduler::new();
        sched.schedule(SimTime::ZERO, EventKind::Start);
        sched.schedule(SimTime(9.0), EventKind::End);
        let mut model = Ticker::new(1.0, 2);
        let seen = sched.run_to_exhaustion(&mut model, &mut NoopObserver).unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(sched.now(), SimTime(9.0));
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn step_on_empty_queue_is_none() {
        let mut sched = Scheduler::new();
        let mut model = Ticker::new(1.0, 1);
        assert!(sched.step(&mut model, &mut NoopObserver).unwrap().is_none());
    }

    #[test]
    fn observer_sees_non_decreasing_times() {
        let mut sched = Scheduler::new();
        sched.schedule(SimTime(0.0), EventKind::Start);
        sched.schedule(SimTime(0.25), EventKind::Arrival);
        sched.schedule(SimTime(0.25), EventKind::Arrival);
        let mut model = Ticker::new(0.1, 12);
        let mut rec = Recorder::default();
        sched.run(&mut model, &mut rec).unwrap();

        assert_eq!(rec.events.len(), 12);
        for pair in rec.events.windows(2) {
            assert!(pair[0].time() <= pair[1].time());
        }
        assert_eq!(rec.ended, Some(sched.now()));
    }
}
