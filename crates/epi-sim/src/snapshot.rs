//! Point-in-time agent records for output.

use epi_agent::{HealthState, Population};
use epi_core::{AgentId, Tick};

/// One agent's observable state at one tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSnapshot {
    pub tick:      Tick,
    pub agent_id:  AgentId,
    pub x:         f64,
    pub y:         f64,
    pub vx:        f64,
    pub vy:        f64,
    pub health:    HealthState,
    pub age_years: f64,
    pub comorbid:  bool,
}

impl AgentSnapshot {
    /// Every agent in `population`, in id order.
    pub fn capture(tick: Tick, population: &Population) -> Vec<AgentSnapshot> {
        population
            .agents()
            .iter()
            .map(|a| AgentSnapshot {
                tick,
                agent_id:  a.id,
                x:         a.position.x,
                y:         a.position.y,
                vx:        a.velocity.x,
                vy:        a.velocity.y,
                health:    a.health(),
                age_years: a.demographics.age_years,
                comorbid:  a.demographics.comorbid,
            })
            .collect()
    }
}
