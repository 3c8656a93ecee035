//! Unit tests for epi-behavior.

use epi_agent::{Agent, BehaviorProfile, Demographics, Population};
use epi_core::{AgentId, AgentRng, BehaviorConfig, Bounds, Tick, Vec2};
use epi_spatial::Environment;

use crate::{BehaviorPolicy, SocialDistancingPolicy, StationaryPolicy, TickContext};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn agent(i: u32, pos: Vec2, mobility: f64, avoidance: f64) -> Agent {
    Agent::new(
        AgentId(i),
        pos,
        BehaviorProfile::new(mobility, avoidance, 0.0).unwrap(),
        Demographics::new(30.0, false, false),
    )
}

fn population(agents: Vec<Agent>) -> Population {
    Population::new(agents, Bounds::new(1.0, 1.0)).unwrap()
}

fn environment() -> Environment {
    Environment::new(Bounds::new(1.0, 1.0), 0.1).unwrap()
}

// ── StationaryPolicy ──────────────────────────────────────────────────────────

#[cfg(test)]
mod stationary_tests {
    use super::*;

    #[test]
    fn always_zero() {
        let pop = population(vec![agent(0, Vec2::new(0.5, 0.5), 1.0, 1.0)]);
        let env = environment();
        let cfg = BehaviorConfig::default();
        let ctx = TickContext::new(Tick(1), &pop, &env, &cfg);
        let mut rng = AgentRng::new(0, AgentId(0));
        for _ in 0..10 {
            let v = StationaryPolicy.plan_move(&pop.agents()[0], &[], &ctx, &mut rng);
            assert_eq!(v, Vec2::ZERO);
        }
    }
}

// ── SocialDistancingPolicy ────────────────────────────────────────────────────

#[cfg(test)]
mod distancing_tests {
    use epi_agent::HealthState;

    use super::*;

    #[test]
    fn speed_never_exceeds_max() {
        let pop = population(vec![
            agent(0, Vec2::new(0.5, 0.5), 1.0, 1.0),
            agent(1, Vec2::new(0.51, 0.5), 1.0, 1.0),
        ]);
        let mut env = environment();
        env.deposit(Vec2::new(0.45, 0.55), 1.0).unwrap();
        let cfg = BehaviorConfig { random_walk_scale: 1.0, max_speed: 0.03, ..Default::default() };
        let ctx = TickContext::new(Tick(1), &pop, &env, &cfg);
        let mut rng = AgentRng::new(3, AgentId(0));
        for _ in 0..200 {
            let v = SocialDistancingPolicy.plan_move(&pop.agents()[0], &[AgentId(1)], &ctx, &mut rng);
            assert!(v.length() <= cfg.max_speed + 1e-12);
        }
    }

    #[test]
    fn immobile_agent_only_avoids() {
        let pop = population(vec![
            agent(0, Vec2::new(0.5, 0.5), 0.0, 1.0),
            agent(1, Vec2::new(0.52, 0.5), 0.0, 0.0),
        ]);
        let env = environment();
        let cfg = BehaviorConfig::default();
        let ctx = TickContext::new(Tick(1), &pop, &env, &cfg);
        let mut rng = AgentRng::new(3, AgentId(0));
        let v = SocialDistancingPolicy.plan_move(&pop.agents()[0], &[AgentId(1)], &ctx, &mut rng);
        // Pushed straight left, away from the neighbour.
        assert!((v.x + cfg.avoidance_strength).abs() < 1e-12);
        assert!(v.y.abs() < 1e-12);
    }

    #[test]
    fn zero_propensity_ignores_neighbours() {
        let pop = population(vec![
            agent(0, Vec2::new(0.5, 0.5), 0.0, 0.0),
            agent(1, Vec2::new(0.52, 0.5), 0.0, 0.0),
        ]);
        let env = environment();
        let cfg = BehaviorConfig::default();
        let ctx = TickContext::new(Tick(1), &pop, &env, &cfg);
        let mut rng = AgentRng::new(3, AgentId(0));
        let v = SocialDistancingPolicy.plan_move(&pop.agents()[0], &[AgentId(1)], &ctx, &mut rng);
        assert_eq!(v, Vec2::ZERO);
    }

    #[test]
    fn repulsion_from_centroid() {
        let pop = population(vec![
            agent(0, Vec2::new(0.5, 0.5), 0.0, 1.0),
            agent(1, Vec2::new(0.5, 0.52), 0.0, 0.0),
            agent(2, Vec2::new(0.5, 0.48), 0.0, 0.0),
            agent(3, Vec2::new(0.53, 0.5), 0.0, 0.0),
        ]);
        let env = environment();
        let cfg = BehaviorConfig::default();
        let ctx = TickContext::new(Tick(1), &pop, &env, &cfg);
        let push = SocialDistancingPolicy::neighbor_repulsion(
            &pop.agents()[0],
            &[AgentId(1), AgentId(2), AgentId(3)],
            &ctx,
        );
        assert!((push.x + 1.0).abs() < 1e-9);
        assert!(push.y.abs() < 1e-9);
    }

    #[test]
    fn dead_neighbours_are_ignored() {
        let mut pop = population(vec![
            agent(0, Vec2::new(0.5, 0.5), 0.0, 1.0),
            agent(1, Vec2::new(0.52, 0.5), 0.0, 0.0),
        ]);
        pop.transition(AgentId(1), HealthState::Infectious, Tick(0), Some(Tick(1))).unwrap();
        pop.transition(AgentId(1), HealthState::Deceased, Tick(1), None).unwrap();
        let env = environment();
        let cfg = BehaviorConfig::default();
        let ctx = TickContext::new(Tick(2), &pop, &env, &cfg);
        let push = SocialDistancingPolicy::neighbor_repulsion(&pop.agents()[0], &[AgentId(1)], &ctx);
        assert_eq!(push, Vec2::ZERO);
    }

    #[test]
    fn pushed_away_from_contaminated_cell() {
        let mut env = environment();
        // Agent in cell (5, 5); contamination in the cell to its right.
        env.deposit(Vec2::new(0.65, 0.55), 1.0).unwrap();
        let push = SocialDistancingPolicy::contamination_repulsion(Vec2::new(0.55, 0.55), &env, 0.1);
        assert!((push.x + 1.0).abs() < 1e-9);
        assert!(push.y.abs() < 1e-9);

        // Below the threshold: no push.
        let mut faint = environment();
        faint.deposit(Vec2::new(0.65, 0.55), 0.05).unwrap();
        let none = SocialDistancingPolicy::contamination_repulsion(Vec2::new(0.55, 0.55), &faint, 0.1);
        assert_eq!(none, Vec2::ZERO);
    }

    #[test]
    fn infectious_agents_walk_slower() {
        let mut pop = population(vec![agent(0, Vec2::new(0.5, 0.5), 1.0, 0.0)]);
        let env = environment();
        let cfg = BehaviorConfig { max_speed: 10.0, ..Default::default() };

        let healthy = {
            let ctx = TickContext::new(Tick(1), &pop, &env, &cfg);
            let mut rng = AgentRng::new(8, AgentId(0));
            SocialDistancingPolicy.plan_move(&pop.agents()[0], &[], &ctx, &mut rng)
        };
        pop.transition(AgentId(0), HealthState::Infectious, Tick(1), Some(Tick(5))).unwrap();
        let sick = {
            let ctx = TickContext::new(Tick(1), &pop, &env, &cfg);
            let mut rng = AgentRng::new(8, AgentId(0));
            SocialDistancingPolicy.plan_move(&pop.agents()[0], &[], &ctx, &mut rng)
        };
        let expected = healthy * cfg.infectious_mobility_factor;
        assert!((sick.x - expected.x).abs() < 1e-12);
        assert!((sick.y - expected.y).abs() < 1e-12);
    }

    #[test]
    fn same_rng_same_velocity() {
        let pop = population(vec![agent(0, Vec2::new(0.5, 0.5), 0.7, 0.3)]);
        let env = environment();
        let cfg = BehaviorConfig::default();
        let ctx = TickContext::new(Tick(1), &pop, &env, &cfg);
        let mut a = AgentRng::new(42, AgentId(0));
        let mut b = AgentRng::new(42, AgentId(0));
        for _ in 0..20 {
            let va = SocialDistancingPolicy.plan_move(&pop.agents()[0], &[], &ctx, &mut a);
            let vb = SocialDistancingPolicy.plan_move(&pop.agents()[0], &[], &ctx, &mut b);
            assert_eq!(va, vb);
        }
    }
}
