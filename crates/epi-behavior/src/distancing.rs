//! The default movement policy: a random walk biased away from crowds and
//! from contaminated ground.

use epi_agent::{Agent, HealthState};
use epi_core::{AgentId, AgentRng, Vec2};
use epi_spatial::{Cell, Environment};

use crate::{BehaviorPolicy, TickContext};

/// Offsets of the eight cells surrounding an agent's own cell.
const RING: [(i32, i32); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

/// Random walk scaled by the agent's mobility, plus two avoidance pushes
/// scaled by its avoidance propensity.
///
/// Per tick the velocity is the sum of
///
/// 1. `N(0, 1)` per axis × `random_walk_scale` × `mobility_randomness`
///    (× `infectious_mobility_factor` while Infectious),
/// 2. a unit vector away from the centroid of the sensed neighbours,
///    × `avoidance_strength` × `avoidance_propensity`,
/// 3. a unit vector away from the contaminated cells among the eight
///    surrounding ones, × `contamination_avoidance_strength` ×
///    `avoidance_propensity`,
///
/// clamped to `max_speed`.  The random walk always draws two normals so the
/// agent's RNG stream advances by the same amount every tick.
#[derive(Copy, Clone, Debug, Default)]
pub struct SocialDistancingPolicy;

impl SocialDistancingPolicy {
    pub fn random_walk(agent: &Agent, ctx: &TickContext<'_>, rng: &mut AgentRng) -> Vec2 {
        let noise = rng.gaussian_vec2();
        let mut scale = ctx.config.random_walk_scale * agent.profile.mobility_randomness;
        if agent.health() == HealthState::Infectious {
            scale *= ctx.config.infectious_mobility_factor;
        }
        noise * scale
    }

    /// Unit vector from the neighbours' centroid to `agent`; zero when no
    /// neighbour is sensed or the agent sits on the centroid.
    pub fn neighbor_repulsion(agent: &Agent, neighbors: &[AgentId], ctx: &TickContext<'_>) -> Vec2 {
        let mut sum = Vec2::ZERO;
        let mut n = 0usize;
        for &id in neighbors {
            if id == agent.id {
                continue;
            }
            let Ok(other) = ctx.population.get(id) else { continue };
            if !other.is_alive() {
                continue;
            }
            sum += other.position;
            n += 1;
        }
        if n == 0 {
            return Vec2::ZERO;
        }
        let centroid = sum * (1.0 / n as f64);
        (agent.position - centroid).normalized().unwrap_or(Vec2::ZERO)
    }

    /// Unit vector away from the surrounding cells above `threshold`, each
    /// weighted by its intensity.
    pub fn contamination_repulsion(position: Vec2, env: &Environment, threshold: f64) -> Vec2 {
        let own = env.cell_of(position);
        let mut push = Vec2::ZERO;
        for (dx, dy) in RING {
            let cell = Cell::new(own.x + dx, own.y + dy);
            if !env.in_grid(cell) {
                continue;
            }
            let intensity = env.sample_cell(cell);
            if intensity <= threshold {
                continue;
            }
            if let Some(away) = (position - env.cell_center(cell)).normalized() {
                push += away * intensity;
            }
        }
        push.normalized().unwrap_or(Vec2::ZERO)
    }
}

impl BehaviorPolicy for SocialDistancingPolicy {
    fn plan_move(
        &self,
        agent:     &Agent,
        neighbors: &[AgentId],
        ctx:       &TickContext<'_>,
        rng:       &mut AgentRng,
    ) -> Vec2 {
        if !agent.is_alive() {
            return Vec2::ZERO;
        }
        let cfg = ctx.config;
        let mut velocity = Self::random_walk(agent, ctx, rng);

        let avoid = agent.profile.avoidance_propensity;
        if avoid > 0.0 {
            velocity += Self::neighbor_repulsion(agent, neighbors, ctx)
                * (cfg.avoidance_strength * avoid);
            velocity += Self::contamination_repulsion(
                agent.position,
                ctx.environment,
                cfg.contamination_threshold,
            ) * (cfg.contamination_avoidance_strength * avoid);
        }

        velocity.clamp_length(cfg.max_speed)
    }
}
