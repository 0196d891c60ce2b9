//! Planes (jobs) owned by the model for their time in the system.

use ap_core::{EntityId, Priority, QueueId, ServerId, SimTime, SlotId};

/// Where an entity currently is.  An entity is in exactly one place at a
/// time; diverted and departed entities are no longer stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Created by the arrival handler, not yet placed.
    Arriving,
    Queued(QueueId),
    Held(SlotId),
    Serving(ServerId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id:               EntityId,
    pub arrival:          SimTime,
    pub priority:         Priority,
    /// Drawn at arrival; used when service starts.
    pub service_duration: f64,
    pub state:            EntityState,
    pub service_start:    Option<SimTime>,
}

impl Entity {
    pub fn new(id: EntityId, arrival: SimTime, priority: Priority, service_duration: f64) -> Self {
        Self {
            id,
            arrival,
            priority,
            service_duration,
            state: EntityState::Arriving,
            service_start: None,
        }
    }

    /// The gate serving this entity, if any.
    pub fn server(&self) -> Option<ServerId> {
        match self.state {
            EntityState::Serving(s) => Some(s),
            _ => None,
        }
    }

    /// `true` once service has started.
    pub fn is_processed(&self) -> bool {
        self.service_start.is_some()
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.state, EntityState::Queued(_) | EntityState::Held(_))
    }
}
