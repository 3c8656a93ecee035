//! `epi-behavior` — how agents decide where to move.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`context`]    | `TickContext<'a>` — read-only tick snapshot for all agents  |
//! | [`policy`]     | `BehaviorPolicy` trait                                      |
//! | [`distancing`] | `SocialDistancingPolicy` — random walk plus avoidance       |
//! | [`stationary`] | `StationaryPolicy` — agents never move                      |
//!
//! # Design notes
//!
//! The movement phase in epi-sim is two-step:
//!
//! 1. **Plan** (optionally parallel): for every agent, call
//!    `BehaviorPolicy::plan_move` against the pre-move snapshot.  All reads go
//!    through `&TickContext`; nothing is mutated.
//!
//! 2. **Commit** (sequential): hand the collected velocities to
//!    `Population::apply_moves`, which integrates and reflects at the edges.
//!
//! Policies are `Send + Sync` and keep no memory between ticks.

pub mod context;
pub mod distancing;
pub mod policy;
pub mod stationary;

#[cfg(test)]
mod tests;

pub use context::TickContext;
pub use distancing::SocialDistancingPolicy;
pub use policy::BehaviorPolicy;
pub use stationary::StationaryPolicy;
