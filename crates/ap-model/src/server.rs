//! Gates.

use ap_core::{EntityId, ServerId, SimTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerStatus {
    #[default]
    Idle,
    /// Bound to exactly one entity since `since`.
    Serving { entity: EntityId, since: SimTime },
}

/// One gate.  Created once at setup; mutated only by the model.
#[derive(Debug, Clone)]
pub struct Server {
    id:        ServerId,
    status:    ServerStatus,
    busy_time: f64,
    services:  u64,
}

impl Server {
    pub fn new(id: ServerId) -> Self {
        Self { id, status: ServerStatus::Idle, busy_time: 0.0, services: 0 }
    }

    #[inline]
    pub fn id(&self) -> ServerId {
        self.id
    }

    #[inline]
    pub fn status(&self) -> ServerStatus {
        self.status
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.status == ServerStatus::Idle
    }

    /// The entity bound to this gate, if any.
    pub fn occupant(&self) -> Option<EntityId> {
        match self.status {
            ServerStatus::Serving { entity, .. } => Some(entity),
            ServerStatus::Idle => None,
        }
    }

    /// Busy time accumulated by completed services.
    pub fn busy_time(&self) -> f64 {
        self.busy_time
    }

    pub fn services(&self) -> u64 {
        self.services
    }

    /// Bind `entity`.  Returns `false` (and changes nothing) if the gate is
    /// already occupied.
    pub fn bind(&mut self, entity: EntityId, now: SimTime) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.status = ServerStatus::Serving { entity, since: now };
        true
    }

    /// Free the gate at `now`.  Returns the start of the finished service,
    /// or `None` if the gate was idle.
    pub fn release(&mut self, now: SimTime) -> Option<SimTime> {
        let ServerStatus::Serving { since, .. } = self.status else {
            return None;
        };
        self.status = ServerStatus::Idle;
        self.busy_time += now.since(since);
        self.services += 1;
        Some(since)
    }
}
