//! `ap-sim`: assembles and runs airport simulations.
//!
//! # Run lifecycle
//!
//! ```text
//! SimBuilder::new(config)            validate config, resolve the seed
//!   .decision_maker(d)               optional external policy
//!   .arrivals(manifest)              optional pre-planned arrivals
//!   .build()      → Sim              Start event queued at t = 0
//! sim.run(&mut observer) → Report    dispatch until the model is complete
//! ```
//!
//! [`run_batch`] repeats a configuration over consecutive seeds and
//! summarises the reports.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs batch replications on Rayon's thread pool.        |
//! | `fx-hash`  | FxHash for the model's in-system entity map.           |
//! | `serde`    | Serialize/Deserialize for config, events and reports.  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ap_core::AirportConfig;
//! use ap_engine::NoopObserver;
//! use ap_sim::SimBuilder;
//!
//! let config = AirportConfig { seed: Some(42), ..AirportConfig::default() };
//! let mut sim = SimBuilder::new(config).build()?;
//! let report = sim.run(&mut NoopObserver)?;
//! println!("{report}");
//! ```

pub mod batch;
pub mod builder;
pub mod error;
pub mod sim;

#[cfg(test)]
mod tests;

pub use batch::{BatchSummary, Spread, run_batch};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use sim::Sim;
