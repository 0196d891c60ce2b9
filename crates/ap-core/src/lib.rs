//! `ap-core`: foundational types for the airport discrete-event simulation.
//!
//! This crate is a dependency of every other `ap-*` crate.  It has no `ap-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`ids`]     | `EntityId`, `ServerId`, `QueueId`, `SlotId`              |
//! | [`time`]    | `SimTime`, `SimClock`                                    |
//! | [`rng`]     | `VariateGenerator`: the run's single random stream      |
//! | [`config`]  | `AirportConfig`, `WaitingConfig`, validation             |
//! | [`priority`]| `Priority` class of an entity                            |
//! | [`error`]   | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod priority;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AirportConfig, WaitingConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{EntityId, QueueId, ServerId, SlotId};
pub use priority::Priority;
pub use rng::VariateGenerator;
pub use time::{SimClock, SimTime};
