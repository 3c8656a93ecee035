//! The epidemiological state machine.
//!
//! ```text
//! Susceptible ──► Exposed ──► Infectious ──┬──► Recovered
//!      │                          ▲        └──► Deceased
//!      └──────── (seeding) ───────┘
//! ```
//!
//! States only move forward.  Recovered and Deceased are terminal; there is
//! no reinfection.  The direct Susceptible → Infectious edge exists only for
//! placing the initial infections before tick 0.

use std::fmt;

/// Health state of one agent.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealthState {
    #[default]
    Susceptible,
    Exposed,
    Infectious,
    Recovered,
    Deceased,
}

impl HealthState {
    pub const ALL: [HealthState; 5] = [
        HealthState::Susceptible,
        HealthState::Exposed,
        HealthState::Infectious,
        HealthState::Recovered,
        HealthState::Deceased,
    ];

    /// Position along the progression.  Recovered and Deceased share a rank.
    #[inline]
    pub fn rank(self) -> u8 {
        match self {
            HealthState::Susceptible => 0,
            HealthState::Exposed     => 1,
            HealthState::Infectious  => 2,
            HealthState::Recovered | HealthState::Deceased => 3,
        }
    }

    /// `true` if `self → next` is an edge of the state machine.
    pub fn can_transition_to(self, next: HealthState) -> bool {
        use HealthState::*;
        matches!(
            (self, next),
            (Susceptible, Exposed)
                | (Susceptible, Infectious)
                | (Exposed, Infectious)
                | (Infectious, Recovered)
                | (Infectious, Deceased)
        )
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, HealthState::Recovered | HealthState::Deceased)
    }

    /// Exposed or Infectious: the outbreak is not over while any agent is here.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, HealthState::Exposed | HealthState::Infectious)
    }

    #[inline]
    pub fn is_alive(self) -> bool {
        self != HealthState::Deceased
    }

    /// Short label, used for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            HealthState::Susceptible => "susceptible",
            HealthState::Exposed     => "exposed",
            HealthState::Infectious  => "infectious",
            HealthState::Recovered   => "recovered",
            HealthState::Deceased    => "deceased",
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── StateCounts ───────────────────────────────────────────────────────────────

/// Number of agents in each health state.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateCounts {
    pub susceptible: usize,
    pub exposed:     usize,
    pub infectious:  usize,
    pub recovered:   usize,
    pub deceased:    usize,
}

impl StateCounts {
    /// Count the states of an arbitrary sequence.
    pub fn tally(states: impl IntoIterator<Item = HealthState>) -> Self {
        let mut counts = StateCounts::default();
        for s in states {
            *counts.slot(s) += 1;
        }
        counts
    }

    pub fn get(&self, state: HealthState) -> usize {
        match state {
            HealthState::Susceptible => self.susceptible,
            HealthState::Exposed     => self.exposed,
            HealthState::Infectious  => self.infectious,
            HealthState::Recovered   => self.recovered,
            HealthState::Deceased    => self.deceased,
        }
    }

    pub fn total(&self) -> usize {
        self.susceptible + self.exposed + self.infectious + self.recovered + self.deceased
    }

    /// Agents in Exposed or Infectious.
    pub fn active(&self) -> usize {
        self.exposed + self.infectious
    }

    /// Agents that have been infected at some point.
    pub fn ever_infected(&self) -> usize {
        self.total() - self.susceptible
    }

    /// Move one agent from `from` to `to`.
    pub(crate) fn shift(&mut self, from: HealthState, to: HealthState) {
        *self.slot(from) -= 1;
        *self.slot(to) += 1;
    }

    fn slot(&mut self, state: HealthState) -> &mut usize {
        match state {
            HealthState::Susceptible => &mut self.susceptible,
            HealthState::Exposed     => &mut self.exposed,
            HealthState::Infectious  => &mut self.infectious,
            HealthState::Recovered   => &mut self.recovered,
            HealthState::Deceased    => &mut self.deceased,
        }
    }
}
