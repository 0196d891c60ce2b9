//! `ap-engine`: the discrete-event core: events, queue, and scheduler loop.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`event`]     | `Event`, `EventKind`: tagged events with typed payloads   |
//! | [`queue`]     | `EventQueue`: binary min-heap, FIFO among equal times     |
//! | [`model`]     | `SimulationModel` trait, `Context` handed to handlers      |
//! | [`scheduler`] | `Scheduler`: owns clock + queue, drives the model         |
//! | [`observer`]  | `SimObserver`, `Notification`, `NoopObserver`              |
//! | [`error`]     | `EngineError`, `EngineResult<T>`                           |
//!
//! # Event loop (summary)
//!
//! ```text
//! loop:
//!   event = queue.pop()            (earliest time, then insertion order)
//!   clock.advance_to(event.time)   (never backwards)
//!   model.handle_event(event)      (may schedule new events via Context)
//!   if model.is_complete(): break
//! report = model.finalize(clock.now)
//! ```
//!
//! The loop runs purely in logical time: it dispatches as fast as the host
//! calls it and never waits on a wall clock.

pub mod error;
pub mod event;
pub mod model;
pub mod observer;
pub mod queue;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use error::{EngineError, EngineResult};
pub use event::{Event, EventKind};
pub use model::{Context, SimulationModel};
pub use observer::{NoopObserver, Notification, SimObserver, WaitingSpot};
pub use queue::EventQueue;
pub use scheduler::Scheduler;
