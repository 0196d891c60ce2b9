//! Read-only notifications for visualization and logging collaborators.

use ap_core::{EntityId, QueueId, ServerId, SimTime, SlotId};

use crate::Event;

/// Where a waiting entity was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitingSpot {
    Queue(QueueId),
    Hold(SlotId),
}

impl WaitingSpot {
    /// The queue or slot index.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            WaitingSpot::Queue(q) => q.index(),
            WaitingSpot::Hold(s) => s.index(),
        }
    }
}

/// One assignment decision made by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    EnteredService { entity: EntityId, server: ServerId },
    /// `position` is 0-based from the head of the queue; always 0 for holds.
    Enqueued { entity: EntityId, spot: WaitingSpot, position: usize },
    Diverted { entity: EntityId },
    Departed { entity: EntityId, server: ServerId },
}

impl Notification {
    pub fn entity(&self) -> EntityId {
        match *self {
            Notification::EnteredService { entity, .. }
            | Notification::Enqueued { entity, .. }
            | Notification::Diverted { entity }
            | Notification::Departed { entity, .. } => entity,
        }
    }
}

/// Callbacks invoked by the scheduler and the model.
///
/// All methods have default no-op implementations so implementors only
/// override what they care about.  Observers never get mutable access to
/// simulation state and cannot stall the loop.
///
/// # Example: printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl SimObserver for Printer {
///     fn on_notification(&mut self, now: SimTime, n: &Notification) {
///         println!("{now}: {n:?}");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called for every event, after the clock moved and before the model
    /// handles it.
    fn on_event(&mut self, _event: &Event) {}

    /// Called by the model for each assignment decision.
    fn on_notification(&mut self, _now: SimTime, _notification: &Notification) {}

    /// Called once after the last event, before `finalize`.
    fn on_sim_end(&mut self, _end: SimTime) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
