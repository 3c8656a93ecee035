//! A policy under which nobody moves.

use epi_agent::Agent;
use epi_core::{AgentId, AgentRng, Vec2};

use crate::{BehaviorPolicy, TickContext};

/// A [`BehaviorPolicy`] that always returns zero velocity.
///
/// With agents pinned in place, contacts depend only on the initial layout,
/// which makes the direct-contact channel easy to isolate in experiments.
pub struct StationaryPolicy;

impl BehaviorPolicy for StationaryPolicy {
    fn plan_move(
        &self,
        _agent:     &Agent,
        _neighbors: &[AgentId],
        _ctx:       &TickContext<'_>,
        _rng:       &mut AgentRng,
    ) -> Vec2 {
        Vec2::ZERO
    }
}
