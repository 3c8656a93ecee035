//! Integration tests for epi-sim.

use epi_agent::{Agent, BehaviorProfile, Demographics, HealthState, Population};
use epi_behavior::{SocialDistancingPolicy, StationaryPolicy};
use epi_core::{AgentId, Bounds, EpiConfig, EpiError, Tick, UnitRange, Vec2};
use epi_spatial::{GridIndex, RTreeIndex};

use crate::{NoopObserver, Sim, SimBuilder, SimError, SimObserver, TickRecord, TimeSeries};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn default_sim(config: EpiConfig) -> Sim<SocialDistancingPolicy, GridIndex> {
    SimBuilder::standard(config).unwrap().build().unwrap()
}

fn agent_at(i: u32, x: f64, y: f64) -> Agent {
    Agent::new(
        AgentId(i),
        Vec2::new(x, y),
        BehaviorProfile::new(0.0, 0.0, 0.0).unwrap(),
        Demographics::new(30.0, false, false),
    )
}

fn layout(points: &[(f64, f64)]) -> Population {
    let agents = points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| agent_at(i as u32, x, y))
        .collect();
    Population::new(agents, Bounds::new(1.0, 1.0)).unwrap()
}

fn mean_nearest_neighbor(population: &Population) -> f64 {
    let agents = population.agents();
    let total: f64 = agents
        .iter()
        .map(|a| {
            agents
                .iter()
                .filter(|b| b.id != a.id)
                .map(|b| a.position.distance(b.position))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();
    total / agents.len() as f64
}

/// Observer that counts hook calls.
#[derive(Default)]
struct Counting {
    ticks:     Vec<Tick>,
    snapshots: Vec<Tick>,
    ended:     Option<Tick>,
}

impl SimObserver for Counting {
    fn on_tick_end(&mut self, record: &TickRecord) {
        self.ticks.push(record.tick);
    }

    fn on_snapshot(
        &mut self,
        tick:         Tick,
        _population:  &Population,
        _environment: &epi_spatial::Environment,
    ) {
        self.snapshots.push(tick);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended = Some(final_tick);
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_seeded_infection() {
        let sim = default_sim(EpiConfig::default());
        assert_eq!(sim.population.len(), 100);
        assert_eq!(sim.population.counts().infectious, 1);
        assert_eq!(sim.clock.current_tick, Tick::ZERO);
        let first = &sim.series().records()[0];
        assert_eq!(first.tick, Tick::ZERO);
        assert_eq!(first.susceptible, 99);
        assert_eq!(first.infectious, 1);
    }

    #[test]
    fn invalid_config_rejected() {
        let mut cfg = EpiConfig::default();
        cfg.population.size = 0;
        let err = SimBuilder::standard(cfg).unwrap().build().err().unwrap();
        assert!(matches!(err, SimError::Epi(_)));
    }

    #[test]
    fn custom_population_used() {
        let pop = layout(&[(0.2, 0.2), (0.8, 0.8)]);
        let sim = SimBuilder::new(EpiConfig::default(), StationaryPolicy, GridIndex::new(0.05).unwrap())
            .population(pop, vec![AgentId(1)])
            .build()
            .unwrap();
        assert_eq!(sim.population.len(), 2);
        assert_eq!(sim.rngs.len(), 2);
        assert_eq!(sim.population.get(AgentId(1)).unwrap().health(), HealthState::Infectious);
    }

    #[test]
    fn population_bounds_must_match_region() {
        let agents = vec![agent_at(0, 0.5, 0.5), agent_at(1, 1.5, 1.5)];
        let pop = Population::new(agents, Bounds::new(2.0, 2.0)).unwrap();
        let err = SimBuilder::new(EpiConfig::default(), StationaryPolicy, RTreeIndex::new())
            .population(pop, vec![AgentId(0)])
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Epi(EpiError::Config(_))));
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loop_tests {
    use super::*;

    #[test]
    fn population_is_conserved() {
        let mut sim = default_sim(EpiConfig::default());
        let series = sim.run(&mut NoopObserver).unwrap();
        for r in series.iter() {
            assert_eq!(r.population(), 100, "at {}", r.tick);
        }
    }

    #[test]
    fn states_only_move_forward() {
        let mut sim = default_sim(EpiConfig::default());
        let mut ranks: Vec<u8> = sim.population.agents().iter().map(|a| a.health().rank()).collect();
        while sim.is_running() {
            sim.step().unwrap();
            for (a, last) in sim.population.agents().iter().zip(ranks.iter_mut()) {
                let now = a.health().rank();
                assert!(now >= *last, "{} regressed", a.id);
                *last = now;
            }
        }
    }

    #[test]
    fn contamination_never_negative() {
        let mut sim = default_sim(EpiConfig::default());
        while sim.is_running() {
            let r = sim.step().unwrap();
            assert!(r.total_contamination >= 0.0);
            assert!(sim.environment.cells().iter().all(|&(_, v)| v >= 0.0));
        }
    }

    #[test]
    fn clock_advances_by_one() {
        let mut sim = default_sim(EpiConfig::default());
        let series = sim.run(&mut NoopObserver).unwrap();
        for (i, r) in series.iter().enumerate() {
            assert_eq!(r.tick, Tick(i as u64));
        }
    }

    #[test]
    fn step_after_stop_is_error() {
        let mut cfg = EpiConfig::default();
        cfg.run.max_ticks = 3;
        let mut sim = default_sim(cfg);
        sim.run(&mut NoopObserver).unwrap();
        assert!(sim.clock.current_tick <= Tick(3));
        assert!(matches!(sim.step(), Err(SimError::Stopped(_))));
    }

    #[test]
    fn max_ticks_is_a_hard_stop() {
        let mut cfg = EpiConfig::default();
        cfg.run.max_ticks = 5;
        cfg.population.initial_infected = 0;
        cfg.run.extra_ticks_after_clear = 1_000;
        let mut sim = default_sim(cfg);
        let series = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(series.final_record().unwrap().tick, Tick(5));
    }

    #[test]
    fn lag_after_clear_extends_run() {
        let run = |extra: u64| {
            let mut cfg = EpiConfig::default();
            cfg.disease.base_transmission_rate = 0.0;
            cfg.disease.environmental_pickup_rate = 0.0;
            cfg.run.extra_ticks_after_clear = extra;
            let pop = layout(&[(0.5, 0.5), (0.1, 0.1)]);
            let mut sim = SimBuilder::new(cfg, StationaryPolicy, RTreeIndex::new())
                .population(pop, vec![AgentId(0)])
                .build()
                .unwrap();
            sim.run(&mut NoopObserver).unwrap().final_record().unwrap().tick
        };
        // The seed's 14-tick infectious period ends at tick 14.
        assert_eq!(run(0), Tick(14));
        assert_eq!(run(5), Tick(19));
    }

    #[test]
    fn observer_hooks_fire() {
        let mut cfg = EpiConfig::default();
        cfg.run.max_ticks = 10;
        cfg.run.snapshot_interval_ticks = 4;
        cfg.population.initial_infected = 0;
        cfg.run.extra_ticks_after_clear = 100;
        let mut sim = default_sim(cfg);
        let mut obs = Counting::default();
        let series = sim.run(&mut obs).unwrap();
        assert_eq!(obs.ticks.len(), series.len());
        assert_eq!(obs.ticks.first(), Some(&Tick(0)));
        assert_eq!(obs.snapshots, vec![Tick(0), Tick(4), Tick(8)]);
        assert_eq!(obs.ended, Some(Tick(10)));
    }

    #[test]
    fn snapshot_covers_every_agent() {
        let sim = default_sim(EpiConfig::default());
        let snap = sim.snapshot();
        assert_eq!(snap.len(), 100);
        assert!(snap.iter().enumerate().all(|(i, s)| s.agent_id == AgentId(i as u32)));
        assert_eq!(snap.iter().filter(|s| s.health == HealthState::Infectious).count(), 1);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod property_tests {
    use super::*;

    #[test]
    fn same_seed_is_bit_identical() {
        let mut a = default_sim(EpiConfig::default());
        let mut b = default_sim(EpiConfig::default());
        let sa = a.run(&mut NoopObserver).unwrap();
        let sb = b.run(&mut NoopObserver).unwrap();
        assert_eq!(sa, sb);
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.environment.cells(), b.environment.cells());
    }

    #[test]
    fn grid_and_rtree_agree() {
        let cfg = EpiConfig::default();
        let mut grid = default_sim(cfg.clone());
        let mut tree = SimBuilder::new(cfg, SocialDistancingPolicy, RTreeIndex::new()).build().unwrap();
        assert_eq!(grid.run(&mut NoopObserver).unwrap(), tree.run(&mut NoopObserver).unwrap());
    }

    #[test]
    fn different_seeds_diverge() {
        let mut cfg = EpiConfig::default();
        let a = default_sim(cfg.clone()).snapshot();
        cfg.run.seed = 7;
        let b = default_sim(cfg).snapshot();
        assert_ne!(a, b);
    }

    #[test]
    fn zero_rates_mean_no_new_infections() {
        let mut cfg = EpiConfig::default();
        cfg.disease.base_transmission_rate = 0.0;
        cfg.disease.environmental_pickup_rate = 0.0;
        let mut sim = default_sim(cfg);
        let series = sim.run(&mut NoopObserver).unwrap();
        assert!(series.iter().all(|r| r.new_exposures() == 0));
        assert_eq!(series.ever_infected(), 1);
    }

    #[test]
    fn contact_channel_in_isolation() {
        let mut cfg = EpiConfig::default();
        cfg.disease.base_transmission_rate = 1.0;
        cfg.disease.environmental_pickup_rate = 0.0;
        let pop = layout(&[(0.5, 0.5), (0.51, 0.5), (0.5, 0.51), (0.1, 0.1), (0.9, 0.9)]);
        let mut sim = SimBuilder::new(cfg, StationaryPolicy, GridIndex::new(0.05).unwrap())
            .population(pop, vec![AgentId(0)])
            .build()
            .unwrap();
        let series = sim.run(&mut NoopObserver).unwrap();

        assert_eq!(series.exposures_by_channel(), (2, 0));
        assert_eq!(series.records()[1].new_contact_exposures, 2);
        for far in [AgentId(3), AgentId(4)] {
            assert_eq!(sim.population.get(far).unwrap().health(), HealthState::Susceptible);
        }
    }

    #[test]
    fn environmental_channel_in_isolation() {
        let mut cfg = EpiConfig::default();
        cfg.disease.base_transmission_rate = 0.0;
        cfg.disease.environmental_pickup_rate = 1.0;
        // Agent 1 shares the seed's cell; agent 2 is far outside its footprint.
        let pop = layout(&[(0.505, 0.505), (0.507, 0.507), (0.1, 0.9)]);
        let mut sim = SimBuilder::new(cfg, StationaryPolicy, GridIndex::new(0.05).unwrap())
            .population(pop, vec![AgentId(0)])
            .build()
            .unwrap();
        let series = sim.run(&mut NoopObserver).unwrap();
        let (contact, environment) = series.exposures_by_channel();
        assert_eq!(contact, 0);
        assert!(environment >= 1);
        assert_eq!(sim.population.get(AgentId(2)).unwrap().health(), HealthState::Susceptible);
    }

    #[test]
    fn avoidance_spreads_agents_out() {
        let spread = |avoidance: f64| {
            let mut cfg = EpiConfig::default();
            cfg.population.size = 200;
            cfg.population.initial_infected = 0;
            cfg.population.mobility = UnitRange::fixed(0.3);
            cfg.population.avoidance = UnitRange::fixed(avoidance);
            cfg.run.max_ticks = 100;
            cfg.run.extra_ticks_after_clear = 1_000;
            let mut sim = default_sim(cfg);
            sim.run(&mut NoopObserver).unwrap();
            mean_nearest_neighbor(&sim.population)
        };
        let without = spread(0.0);
        let with = spread(1.0);
        assert!(with >= 1.1 * without, "with {with:.4} vs without {without:.4}");
    }

    #[test]
    fn reference_scenario_burns_out() {
        // 100 agents, seed 42, at most 500 ticks.
        let cfg = EpiConfig::default();
        assert_eq!((cfg.population.size, cfg.run.seed, cfg.run.max_ticks), (100, 42, 500));
        let mut sim = default_sim(cfg);
        let series: TimeSeries = sim.run(&mut NoopObserver).unwrap();
        let last = series.final_record().unwrap();

        assert!(last.tick < Tick(500), "still running at {}", last.tick);
        assert_eq!(last.exposed + last.infectious, 0);
        assert_eq!(last.recovered + last.deceased, series.ever_infected());
        assert!(last.susceptible <= 99);
        let (peak_tick, peak) = series.peak_infectious().unwrap();
        assert!(peak >= 1 && peak_tick <= last.tick);
    }
}
