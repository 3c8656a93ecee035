//! The `BehaviorPolicy` trait — the movement extension point.

use epi_agent::Agent;
use epi_core::{AgentId, AgentRng, Vec2};

use crate::TickContext;

/// Pluggable movement rule.
///
/// Given one agent, the agents it senses, and the shared [`TickContext`],
/// return the agent's velocity for this tick.  The engine applies it
/// afterwards (integrate, reflect at the region edges), so implementations
/// never mutate anything except the agent's own [`AgentRng`].
///
/// # Neighbours
///
/// `neighbors` holds the alive agents within `ctx.config.sensing_radius` of
/// `agent`, in ascending id order, **excluding `agent` itself**.  Deceased
/// agents are never sensed.
///
/// # Thread safety
///
/// The engine may call `plan_move` for many agents in parallel via Rayon, so
/// implementations must be `Send + Sync` and hold no per-agent state.
///
/// # Example
///
/// ```rust,ignore
/// struct DriftEast;
///
/// impl BehaviorPolicy for DriftEast {
///     fn plan_move(&self, _: &Agent, _: &[AgentId], ctx: &TickContext<'_>, _: &mut AgentRng) -> Vec2 {
///         Vec2::new(ctx.config.max_speed, 0.0)
///     }
/// }
/// ```
pub trait BehaviorPolicy: Send + Sync + 'static {
    /// Velocity for `agent` this tick.  The length must not exceed
    /// `ctx.config.max_speed`.
    fn plan_move(
        &self,
        agent:     &Agent,
        neighbors: &[AgentId],
        ctx:       &TickContext<'_>,
        rng:       &mut AgentRng,
    ) -> Vec2;
}
