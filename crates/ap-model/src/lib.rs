//! `ap-model`: the airport's state machine and resource-allocation policy.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`entity`]   | `Entity`, `EntityState`                                      |
//! | [`server`]   | `Server`, `ServerStatus`                                     |
//! | [`waiting`]  | `WaitingArea`: parallel FIFO queues or hold slots           |
//! | [`decision`] | `DecisionMaker` trait, `Observation`, `NoDecision`           |
//! | [`manifest`] | `ArrivalManifest`, CSV loading of pre-planned arrivals       |
//! | [`airport`]  | `AirportModel`: implements `ap_engine::SimulationModel`     |
//! | [`error`]    | `ModelError`, `DecisionError`                                |
//!
//! # Entity lifecycle
//!
//! ```text
//! Arrival ─┬─ idle gate ───────────────────────────► Serving ─► Departed
//!          ├─ waiting room ─► Queued / Held ─ pull ─► Serving ─► Departed
//!          └─ no room ──────► Diverted (counted, no further events)
//! ```
//!
//! When a gate frees, the waiting entity to serve next is chosen by the
//! [`DecisionMaker`] if one answers validly, otherwise by the default
//! policy: earliest-arrived high-priority entity first, then the head of the
//! longest queue (queues) or the earliest-arrived held entity (holds).

pub mod airport;
pub mod decision;
pub mod entity;
pub mod error;
pub mod manifest;
pub mod server;
pub mod waiting;


pub use airport::AirportModel;
pub use decision::{DecisionMaker, FirstWaiting, NO_ENTITY, NoDecision, Observation};
pub use entity::{Entity, EntityState};
pub use error::{DecisionError, ModelError, ModelResult};
pub use manifest::{ArrivalManifest, PlannedArrival, load_manifest_csv, load_manifest_reader};
pub use server::{Server, ServerStatus};
pub use waiting::WaitingArea;
