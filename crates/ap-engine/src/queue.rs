//! `EventQueue`: time-ordered pending events.
//!
//! A binary min-heap keyed on `(time, seq)`.  `seq` is a per-queue insertion
//! counter, so events with equal timestamps pop in the order they were
//! pushed.  That stability is what makes a seeded run replay exactly.
//!
//! `push` and `pop` are O(log n); `peek` and `len` are O(1).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ap_core::SimTime;

use crate::{EngineError, EngineResult, Event, EventKind};

/// Heap entry with the ordering reversed, turning `BinaryHeap`'s max-heap
/// into a min-heap on `(time, seq)`.
struct Pending(Event);

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .time()
            .cmp(&self.0.time())
            .then_with(|| other.0.seq().cmp(&self.0.seq()))
    }
}

/// Pending events, earliest first.
#[derive(Default)]
pub struct EventQueue {
    heap:     BinaryHeap<Pending>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `kind` at `time` and return the queued event.
    pub fn push(&mut self, time: SimTime, kind: EventKind) -> Event {
        let event = Event::new(time, self.next_seq, kind);
        self.next_seq += 1;
        self.heap.push(Pending(event));
        event
    }

    /// Remove and return the earliest event.
    ///
    /// Fails with [`EngineError::EmptyQueue`] when nothing is pending.
    pub fn pop(&mut self) -> EngineResult<Event> {
        self.try_pop().ok_or(EngineError::EmptyQueue)
    }

    /// Like [`pop`](Self::pop) but `None` on empty: the loop-termination form.
    pub fn try_pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|p| p.0)
    }

    /// The earliest event without removing it.
    pub fn peek(&self) -> Option<&Event> {
        self.heap.peek().map(|p| &p.0)
    }

    /// Timestamp of the earliest event, or `None` if empty.
    pub fn next_time(&self) -> Option<SimTime> {
        self.peek().map(Event::time)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Total number of events ever pushed.
    pub fn pushed(&self) -> u64 {
        self.next_seq
    }
}
