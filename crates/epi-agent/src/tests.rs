//! Unit tests for epi-agent.

use epi_core::{AgentId, Bounds, Tick, Vec2};

use crate::{Agent, BehaviorProfile, Demographics, HealthState, Population};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn agent_at(i: u32, x: f64, y: f64) -> Agent {
    Agent::new(
        AgentId(i),
        Vec2::new(x, y),
        BehaviorProfile::default(),
        Demographics::new(30.0, false, false),
    )
}

fn small_population(n: u32) -> Population {
    let agents = (0..n).map(|i| agent_at(i, 0.1 * i as f64, 0.5)).collect();
    Population::new(agents, Bounds::new(1.0, 1.0)).unwrap()
}

// ── HealthState ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod health_tests {
    use super::*;
    use crate::StateCounts;

    #[test]
    fn legal_edges() {
        use HealthState::*;
        assert!(Susceptible.can_transition_to(Exposed));
        assert!(Exposed.can_transition_to(Infectious));
        assert!(Infectious.can_transition_to(Recovered));
        assert!(Infectious.can_transition_to(Deceased));
        assert!(Susceptible.can_transition_to(Infectious));
    }

    #[test]
    fn no_regression_or_reinfection() {
        use HealthState::*;
        for from in HealthState::ALL {
            for to in HealthState::ALL {
                if from.can_transition_to(to) {
                    assert!(to.rank() > from.rank(), "{from} -> {to} is not forward");
                }
            }
        }
        assert!(!Recovered.can_transition_to(Susceptible));
        assert!(!Recovered.can_transition_to(Exposed));
        assert!(!Deceased.can_transition_to(Recovered));
        assert!(!Exposed.can_transition_to(Recovered));
    }

    #[test]
    fn tally_and_totals() {
        let counts = StateCounts::tally([
            HealthState::Susceptible,
            HealthState::Susceptible,
            HealthState::Infectious,
            HealthState::Deceased,
        ]);
        assert_eq!(counts.susceptible, 2);
        assert_eq!(counts.get(HealthState::Infectious), 1);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.active(), 1);
        assert_eq!(counts.ever_infected(), 2);
    }

    #[test]
    fn display_labels() {
        assert_eq!(HealthState::Exposed.to_string(), "exposed");
        assert_eq!(HealthState::Deceased.as_str(), "deceased");
    }
}

// ── BehaviorProfile / Demographics ────────────────────────────────────────────

#[cfg(test)]
mod profile_tests {
    use epi_core::{AgeModel, ComorbidityModel, SimRng};

    use crate::demographics::draw_age;
    use crate::erlang_cdf;

    use super::*;

    #[test]
    fn profile_rejects_out_of_range() {
        assert!(BehaviorProfile::new(0.5, 0.5, 0.5).is_ok());
        assert!(BehaviorProfile::new(1.1, 0.5, 0.5).is_err());
        assert!(BehaviorProfile::new(0.5, -0.1, 0.5).is_err());
    }

    #[test]
    fn erlang_cdf_matches_reference_points() {
        // shape 12, scale 4.5: ~0.2% at 20, ~43% at 50, ~99% at 100.
        assert!(erlang_cdf(12, 4.5, 20.0) < 0.01);
        let mid = erlang_cdf(12, 4.5, 50.0);
        assert!((0.35..0.50).contains(&mid), "got {mid}");
        assert!(erlang_cdf(12, 4.5, 100.0) > 0.98);
        assert_eq!(erlang_cdf(12, 4.5, 0.0), 0.0);
    }

    #[test]
    fn erlang_shape_one_is_exponential() {
        let x = 2.0;
        let expected = 1.0 - (-x / 3.0f64).exp();
        assert!((erlang_cdf(1, 3.0, x) - expected).abs() < 1e-12);
    }

    #[test]
    fn ages_stay_in_range() {
        let mut rng = SimRng::new(3);
        let pyramid = AgeModel::default();
        let normal = AgeModel::Normal { mean: 95.0, sd: 10.0 };
        for _ in 0..500 {
            let a = draw_age(&pyramid, &mut rng).unwrap();
            assert!((0.0..=104.0).contains(&a));
            let b = draw_age(&normal, &mut rng).unwrap();
            assert!((0.0..=104.0).contains(&b));
        }
    }

    #[test]
    fn comorbid_implies_long_illness() {
        let mut rng = SimRng::new(11);
        let age = AgeModel::Normal { mean: 80.0, sd: 5.0 };
        for _ in 0..200 {
            let d = Demographics::draw(&age, &ComorbidityModel::default(), &mut rng).unwrap();
            if d.comorbid {
                assert!(d.long_illness);
            }
        }
    }
}

// ── Population ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod population_tests {
    use epi_core::EpiError;

    use super::*;

    #[test]
    fn initial_counts_all_susceptible() {
        let pop = small_population(5);
        assert_eq!(pop.counts().susceptible, 5);
        assert_eq!(pop.counts().total(), 5);
        assert!(!pop.has_active_infections());
        pop.verify_counts().unwrap();
    }

    #[test]
    fn transition_updates_counts_and_timestamps() {
        let mut pop = small_population(3);
        pop.transition(AgentId(1), HealthState::Exposed, Tick(4), Some(Tick(9))).unwrap();
        let a = pop.get(AgentId(1)).unwrap();
        assert_eq!(a.health(), HealthState::Exposed);
        assert_eq!(a.state_entered_at(), Tick(4));
        assert_eq!(a.transition_at(), Some(Tick(9)));
        assert!(!a.transition_due(Tick(8)));
        assert!(a.transition_due(Tick(9)));
        assert_eq!(pop.counts().exposed, 1);
        assert_eq!(pop.counts().susceptible, 2);
        pop.verify_counts().unwrap();
    }

    #[test]
    fn illegal_transition_is_invariant_error() {
        let mut pop = small_population(1);
        let err = pop
            .transition(AgentId(0), HealthState::Recovered, Tick(1), None)
            .unwrap_err();
        assert!(matches!(err, EpiError::Invariant(_)));
        assert_eq!(pop.counts().susceptible, 1);
    }

    #[test]
    fn unknown_agent_rejected() {
        let mut pop = small_population(1);
        assert!(matches!(
            pop.transition(AgentId(5), HealthState::Exposed, Tick(1), None),
            Err(EpiError::AgentNotFound(_))
        ));
    }

    #[test]
    fn mismatched_ids_rejected() {
        let agents = vec![agent_at(1, 0.5, 0.5)];
        assert!(Population::new(agents, Bounds::new(1.0, 1.0)).is_err());
    }

    #[test]
    fn apply_moves_reflects_at_edges() {
        let mut pop = small_population(2);
        // agent 0 sits at x = 0.0 and is pushed further left.
        pop.apply_moves(&[Vec2::new(-0.2, 0.0), Vec2::new(0.05, 0.0)]).unwrap();
        let a0 = &pop.agents()[0];
        assert!((a0.position.x - 0.2).abs() < 1e-12);
        assert_eq!(a0.velocity, Vec2::new(0.2, 0.0));
        let a1 = &pop.agents()[1];
        assert!((a1.position.x - 0.15).abs() < 1e-12);
        for a in pop.agents() {
            assert!(pop.bounds().contains(a.position));
        }
    }

    #[test]
    fn deceased_agents_do_not_move() {
        let mut pop = small_population(1);
        pop.transition(AgentId(0), HealthState::Infectious, Tick(0), Some(Tick(1))).unwrap();
        pop.transition(AgentId(0), HealthState::Deceased, Tick(1), None).unwrap();
        let before = pop.agents()[0].position;
        pop.apply_moves(&[Vec2::new(0.1, 0.1)]).unwrap();
        assert_eq!(pop.agents()[0].position, before);
        assert_eq!(pop.agents()[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn wrong_velocity_count_rejected() {
        let mut pop = small_population(2);
        assert!(pop.apply_moves(&[Vec2::ZERO]).is_err());
    }
}

// ── PopulationBuilder ─────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use epi_core::{EpiConfig, UnitRange};

    use crate::PopulationBuilder;

    use super::*;

    #[test]
    fn builds_requested_size_inside_bounds() {
        let cfg = EpiConfig::default();
        let seeded = PopulationBuilder::new(&cfg.population, cfg.region.bounds(), 7)
            .build()
            .unwrap();
        assert_eq!(seeded.population.len(), cfg.population.size);
        assert_eq!(seeded.rngs.len(), cfg.population.size);
        for (i, a) in seeded.population.agents().iter().enumerate() {
            assert_eq!(a.id, AgentId(i as u32));
            assert!(cfg.region.bounds().contains(a.position));
            assert_eq!(a.health(), HealthState::Susceptible);
        }
    }

    #[test]
    fn profiles_respect_ranges() {
        let mut cfg = EpiConfig::default();
        cfg.population.mobility = UnitRange::new(0.2, 0.3);
        cfg.population.avoidance = UnitRange::fixed(1.0);
        cfg.population.cleaning = UnitRange::fixed(0.5);
        cfg.population.initial_infected = 0;
        let seeded = PopulationBuilder::new(&cfg.population, cfg.region.bounds(), 1)
            .build()
            .unwrap();
        for a in seeded.population.agents() {
            assert!((0.2..=0.3).contains(&a.profile.mobility_randomness));
            assert_eq!(a.profile.avoidance_propensity, 1.0);
            assert_eq!(a.profile.cleaning_propensity, 0.5);
        }
        assert!(seeded.seeds.is_empty());
    }

    #[test]
    fn seeds_take_configured_location_and_stop_cleaning() {
        let mut cfg = EpiConfig::default();
        cfg.population.cleaning = UnitRange::fixed(0.9);
        cfg.population.initial_infected = 3;
        cfg.population.seed_locations = vec![Vec2::new(0.25, 0.75)];
        let seeded = PopulationBuilder::new(&cfg.population, cfg.region.bounds(), 5)
            .build()
            .unwrap();
        assert_eq!(seeded.seeds.len(), 3);
        let first = seeded.population.get(seeded.seeds[0]).unwrap();
        assert_eq!(first.position, Vec2::new(0.25, 0.75));
        for &id in &seeded.seeds {
            assert_eq!(seeded.population.get(id).unwrap().profile.cleaning_propensity, 0.0);
        }
    }

    #[test]
    fn same_seed_same_population() {
        let cfg = EpiConfig::default();
        let a = PopulationBuilder::new(&cfg.population, cfg.region.bounds(), 99).build().unwrap();
        let b = PopulationBuilder::new(&cfg.population, cfg.region.bounds(), 99).build().unwrap();
        assert_eq!(a.population.agents(), b.population.agents());
        assert_eq!(a.seeds, b.seeds);
    }
}
