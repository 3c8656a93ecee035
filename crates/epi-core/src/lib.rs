//! `epi-core` — foundational types for the `epi` outbreak simulator.
//!
//! This crate is a dependency of every other `epi-*` crate.  It intentionally
//! has no `epi-*` dependencies and minimal external ones (`rand`,
//! `rand_distr` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                             |
//! | [`geo`]         | `Vec2`, `Bounds`                                      |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`config`]      | `EpiConfig` and its sections, `validate()`            |
//! | [`error`]       | `EpiError`, `EpiResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required to load `EpiConfig` from JSON.                    |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    AgeModel, BehaviorConfig, ComorbidityModel, DiseaseConfig, DurationModel, EnvironmentConfig,
    EpiConfig, MortalityBand, MortalityTable, PopulationConfig, RegionConfig, RunConfig, UnitRange,
};
pub use error::{EpiError, EpiResult};
pub use geo::{Bounds, Vec2};
pub use ids::AgentId;
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, Tick};
