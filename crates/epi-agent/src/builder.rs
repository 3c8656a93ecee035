//! Randomised construction of a `Population` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use epi_agent::PopulationBuilder;
//! use epi_core::EpiConfig;
//!
//! let cfg = EpiConfig::default();
//! let seeded = PopulationBuilder::new(&cfg.population, cfg.region.bounds(), /*seed=*/ 42)
//!     .with_comorbidity(cfg.disease.comorbidity.clone())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(seeded.population.len(), 100);
//! assert_eq!(seeded.rngs.len(), 100);
//! assert_eq!(seeded.seeds.len(), 1);
//! ```

use epi_core::{AgentId, Bounds, ComorbidityModel, EpiResult, PopulationConfig, SimRng, Vec2};

use crate::{Agent, AgentRngs, BehaviorProfile, Demographics, Population};

/// Offset of the setup stream, so it never replays an agent's own stream.
const SETUP_STREAM: u64 = 0x5e7_u64;

/// Output of [`PopulationBuilder::build`].
pub struct SeededPopulation {
    /// Every agent, all Susceptible.
    pub population: Population,
    pub rngs:       AgentRngs,
    /// Agents chosen to start Infectious, ascending.  Their positions and
    /// cleaning propensities are already adjusted; the caller moves them into
    /// Infectious with a drawn infectious period.
    pub seeds:      Vec<AgentId>,
}

/// Builds a population with uniformly random positions and profiles drawn
/// from the configured ranges.
pub struct PopulationBuilder<'a> {
    config:      &'a PopulationConfig,
    bounds:      Bounds,
    seed:        u64,
    comorbidity: ComorbidityModel,
}

impl<'a> PopulationBuilder<'a> {
    pub fn new(config: &'a PopulationConfig, bounds: Bounds, seed: u64) -> Self {
        Self {
            config,
            bounds,
            seed,
            comorbidity: ComorbidityModel::default(),
        }
    }

    /// Override the age → pre-existing-condition risk curve.
    pub fn with_comorbidity(mut self, model: ComorbidityModel) -> Self {
        self.comorbidity = model;
        self
    }

    /// Draw every agent, then pick the initially infected ones.
    ///
    /// Draw order is fixed (per agent: position, profile, demographics; then
    /// seed selection) so a given seed always yields the same population.
    pub fn build(self) -> EpiResult<SeededPopulation> {
        let cfg = self.config;
        let mut rng = SimRng::new(self.seed).child(SETUP_STREAM);

        let mut agents = Vec::with_capacity(cfg.size);
        for i in 0..cfg.size {
            let position = Vec2::new(
                rng.random::<f64>() * self.bounds.width,
                rng.random::<f64>() * self.bounds.height,
            );
            let profile = BehaviorProfile::new(
                cfg.mobility.sample(&mut rng),
                cfg.avoidance.sample(&mut rng),
                cfg.cleaning.sample(&mut rng),
            )?;
            let demographics = Demographics::draw(&cfg.age, &self.comorbidity, &mut rng)?;
            agents.push(Agent::new(AgentId(i as u32), position, profile, demographics));
        }

        let picked = rng.choose_indices(cfg.size, cfg.initial_infected);
        for (k, &idx) in picked.iter().enumerate() {
            let agent = &mut agents[idx];
            if let Some(&loc) = cfg.seed_locations.get(k) {
                agent.position = self.bounds.clamp(loc);
            }
            if !cfg.seeds_clean {
                agent.profile.cleaning_propensity = 0.0;
            }
        }
        let seeds = picked.into_iter().map(|i| AgentId(i as u32)).collect();

        Ok(SeededPopulation {
            population: Population::new(agents, self.bounds)?,
            rngs:       AgentRngs::new(cfg.size, self.seed),
            seeds,
        })
    }
}
