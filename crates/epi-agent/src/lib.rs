//! `epi-agent` — agent records and population storage for the `epi` simulator.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                |
//! |------------------|---------------------------------------------------------|
//! | [`health`]       | `HealthState` state machine, `StateCounts`              |
//! | [`profile`]      | `BehaviorProfile` (mobility / avoidance / cleaning)     |
//! | [`demographics`] | `Demographics`, age draws, comorbidity risk curve       |
//! | [`agent`]        | `Agent` record                                          |
//! | [`store`]        | `Population` (agents + counts), `AgentRngs`             |
//! | [`builder`]      | `PopulationBuilder` (randomised construction)           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all public types.       |

pub mod agent;
pub mod builder;
pub mod demographics;
pub mod health;
pub mod profile;
pub mod store;

#[cfg(test)]
mod tests;

pub use agent::Agent;
pub use builder::{PopulationBuilder, SeededPopulation};
pub use demographics::{Demographics, erlang_cdf};
pub use health::{HealthState, StateCounts};
pub use profile::BehaviorProfile;
pub use store::{AgentRngs, Population};
