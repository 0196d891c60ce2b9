//! Hook for delegating "who is served next" to an external policy.
//!
//! When a gate frees and more than one entity is waiting, the model builds a
//! fixed-size [`Observation`] and asks its [`DecisionMaker`] for a slot
//! index.  Any answer that does not name an occupied slot (including
//! [`NO_ENTITY`]) is rejected and the model's default policy decides
//! instead, so a missing or broken decision maker can never stall a run.

use ap_core::{EntityId, Priority};

use crate::DecisionError;

/// Slot value for "no entity", and the answer for "no valid choice".
pub const NO_ENTITY: i32 = -1;

/// Fixed-size view of the waiting entities.
///
/// Slot `i` holds [`NO_ENTITY`] or the [`Priority::code`] of the `i`-th
/// waiting entity (`0` normal, `1` high).  Entities beyond the slot count
/// are not offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    slots:    Vec<i32>,
    entities: Vec<EntityId>,
}

impl Observation {
    /// Build an observation of `size` slots from waiting entities in
    /// observation order.
    pub fn build(waiting: impl IntoIterator<Item = (EntityId, Priority)>, size: usize) -> Self {
        let mut slots = vec![NO_ENTITY; size];
        let mut entities = Vec::with_capacity(size);
        for (slot, (entity, priority)) in slots.iter_mut().zip(waiting) {
            *slot = priority.code();
            entities.push(entity);
        }
        Self { slots, entities }
    }

    /// The raw vector handed to the decision maker.
    pub fn slots(&self) -> &[i32] {
        &self.slots
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.entities.len()
    }

    /// Entity in slot `index`, if occupied.
    pub fn entity(&self, index: usize) -> Option<EntityId> {
        self.entities.get(index).copied()
    }

    /// Validate a decision maker's answer.
    pub fn resolve(&self, choice: i32) -> Result<EntityId, DecisionError> {
        if choice == NO_ENTITY {
            return Err(DecisionError::NoChoice);
        }
        let index = usize::try_from(choice)
            .ok()
            .filter(|&i| i < self.slots.len())
            .ok_or(DecisionError::OutOfRange { choice, size: self.slots.len() })?;
        self.entity(index).ok_or(DecisionError::EmptySlot(index))
    }
}

/// External policy consulted when several entities compete for a gate.
///
/// Return the slot index of the entity to serve next, or [`NO_ENTITY`].
/// Must not block; answers are validated by the model.
pub trait DecisionMaker {
    fn decide(&mut self, observation: &Observation) -> i32;
}

/// Any `FnMut(&Observation) -> i32` closure is a decision maker.
impl<F> DecisionMaker for F
where
    F: FnMut(&Observation) -> i32,
{
    fn decide(&mut self, observation: &Observation) -> i32 {
        self(observation)
    }
}

/// Never chooses; the model's default policy always applies.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDecision;

impl DecisionMaker for NoDecision {
    #[inline]
    fn decide(&mut self, _observation: &Observation) -> i32 {
        NO_ENTITY
    }
}

/// Picks the first occupied slot: plain first-come order across the
/// observation, ignoring priority.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstWaiting;

impl DecisionMaker for FirstWaiting {
    fn decide(&mut self, observation: &Observation) -> i32 {
        observation
            .slots()
            .iter()
            .position(|&s| s != NO_ENTITY)
            .map_or(NO_ENTITY, |i| i as i32)
    }
}
