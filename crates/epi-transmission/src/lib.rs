//! `epi-transmission` — who gets infected, and what happens next.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`probability`] | Contact / environmental infection probabilities, clamping |
//! | [`disease`]     | `DiseaseModel`: incubation, infectious period, mortality  |
//! | [`model`]       | `TransmissionModel` (plan / commit / shed / seed)         |
//!
//! # Two-step update
//!
//! Like movement, transmission is split so every agent sees the same world:
//!
//! 1. [`TransmissionModel::plan`] decides one agent's [`Transition`] from a
//!    read-only snapshot.  Safe to run for all agents in parallel.
//! 2. [`TransmissionModel::commit`] applies every planned transition to the
//!    population in id order and returns a [`TransmissionTally`].
//!
//! [`TransmissionModel::shed`] then writes this tick's contamination and
//! cleaning into the environment.

pub mod disease;
pub mod model;
pub mod probability;


pub use disease::{DiseaseModel, DurationSampler};
pub use model::{ExposureChannel, Planned, TransmissionModel, TransmissionTally, Transition};
pub use probability::{checked_probability, contact_probability, environmental_probability};
