//! The `Agent` record.

use epi_core::{AgentId, Tick, Vec2};

use crate::{BehaviorProfile, Demographics, HealthState};

/// One simulated individual.
///
/// Position and velocity are public and rewritten every tick by the movement
/// phase.  Health fields are private: they change only through
/// [`Population::transition`][crate::Population::transition], which keeps the
/// per-state counts in step and rejects illegal transitions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id:           AgentId,
    pub position:     Vec2,
    pub velocity:     Vec2,
    pub profile:      BehaviorProfile,
    pub demographics: Demographics,

    health:           HealthState,
    state_entered_at: Tick,
    transition_at:    Option<Tick>,
}

impl Agent {
    /// A Susceptible agent at rest.
    pub fn new(id: AgentId, position: Vec2, profile: BehaviorProfile, demographics: Demographics) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            profile,
            demographics,
            health: HealthState::Susceptible,
            state_entered_at: Tick::ZERO,
            transition_at: None,
        }
    }

    #[inline]
    pub fn health(&self) -> HealthState {
        self.health
    }

    /// Tick at which the current health state began.
    #[inline]
    pub fn state_entered_at(&self) -> Tick {
        self.state_entered_at
    }

    /// Tick at which the pending timed transition (end of incubation or of
    /// the infectious period) fires.  `None` outside Exposed / Infectious.
    #[inline]
    pub fn transition_at(&self) -> Option<Tick> {
        self.transition_at
    }

    /// `true` once `now` has reached the pending transition tick.
    #[inline]
    pub fn transition_due(&self, now: Tick) -> bool {
        self.transition_at.is_some_and(|t| now >= t)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    pub(crate) fn set_health(&mut self, next: HealthState, now: Tick, transition_at: Option<Tick>) {
        self.health = next;
        self.state_entered_at = now;
        self.transition_at = transition_at;
    }
}
