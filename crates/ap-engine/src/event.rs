//! Events: the only way state changes in a run.
//!
//! Each kind carries exactly the payload its handler needs, so dispatch is an
//! exhaustive `match` and no handler can fail on a missing attribute.

use std::fmt;

use ap_core::{EntityId, ServerId, SimTime, SlotId};

/// What happens at an event's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// Kick-off: schedules the first arrival (and the horizon, if any).
    Start,

    /// A new entity reaches the facility.
    Arrival,

    /// `entity` finishes service at `server` and departs.
    ServiceComplete { entity: EntityId, server: ServerId },

    /// `entity`, waiting in hold `slot`, retries for a gate.
    HoldRelease { entity: EntityId, slot: SlotId },

    /// Horizon reached: the run stops even if entities remain.
    End,
}

impl EventKind {
    /// Short lowercase label for logs and CSV output.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::Arrival => "arrival",
            EventKind::ServiceComplete { .. } => "service_complete",
            EventKind::HoldRelease { .. } => "hold_release",
            EventKind::End => "end",
        }
    }
}

/// A scheduled event.  Immutable once queued; consumed exactly once.
///
/// `seq` is assigned by the [`EventQueue`](crate::EventQueue) on insertion
/// and breaks ties between equal timestamps in insertion order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    time: SimTime,
    seq:  u64,
    kind: EventKind,
}

impl Event {
    pub(crate) fn new(time: SimTime, seq: u64, kind: EventKind) -> Self {
        Self { time, seq, kind }
    }

    #[inline]
    pub fn time(&self) -> SimTime {
        self.time
    }

    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    #[inline]
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{} {}", self.time, self.seq, self.kind.label())
    }
}
