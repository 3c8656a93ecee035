//! Fluent builder for constructing a [`Sim`].

use epi_agent::{AgentRngs, Population, PopulationBuilder};
use epi_behavior::{BehaviorPolicy, SocialDistancingPolicy};
use epi_core::{AgentId, EpiConfig, EpiError, SimClock, Tick};
use epi_spatial::{Environment, GridIndex, NeighborIndex};
use epi_transmission::TransmissionModel;

use crate::{Sim, SimResult, StatisticsRecorder};

/// Fluent builder for [`Sim<B, I>`].
///
/// # Required inputs
///
/// - [`EpiConfig`] — validated in [`build`](Self::build)
/// - `B: BehaviorPolicy` — the movement rule
/// - `I: NeighborIndex` — the spatial index (e.g. [`GridIndex`])
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                                  |
/// |-------------------------|------------------------------------------|
/// | `.population(p, seeds)` | Drawn at random from `config.population` |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, SocialDistancingPolicy, GridIndex::new(0.05)?)
///     .build()?;
/// let series = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<B: BehaviorPolicy, I: NeighborIndex> {
    config:     EpiConfig,
    policy:     B,
    index:      I,
    population: Option<(Population, Vec<AgentId>)>,
}

impl SimBuilder<SocialDistancingPolicy, GridIndex> {
    /// The default policy over a grid index whose buckets match the larger of
    /// the sensing and contact radii.
    pub fn standard(config: EpiConfig) -> SimResult<Self> {
        let radius = config.behavior.sensing_radius.max(config.disease.contact_radius);
        let bucket = if radius > 0.0 { radius } else { config.region.cell_size };
        let index = GridIndex::new(bucket)?;
        Ok(Self::new(config, SocialDistancingPolicy, index))
    }
}

impl<B: BehaviorPolicy, I: NeighborIndex> SimBuilder<B, I> {
    /// Create a builder with all required inputs.
    pub fn new(config: EpiConfig, policy: B, index: I) -> Self {
        Self { config, policy, index, population: None }
    }

    /// Use a pre-built population instead of drawing one.  `seeds` start
    /// Infectious at tick 0.  Its bounds must match `config.region`.
    pub fn population(mut self, population: Population, seeds: Vec<AgentId>) -> Self {
        self.population = Some((population, seeds));
        self
    }

    /// Validate the config, create the population and environment, seed the
    /// initial infections, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<B, I>> {
        let config = self.config;
        config.validate()?;

        let seed = config.run.seed;
        let (mut population, seeds) = match self.population {
            Some((population, seeds)) => {
                let region = config.region.bounds();
                if population.bounds() != region {
                    return Err(EpiError::Config(format!(
                        "population bounds {}x{} differ from region {}x{}",
                        population.bounds().width,
                        population.bounds().height,
                        region.width,
                        region.height
                    ))
                    .into());
                }
                (population, seeds)
            }
            None => {
                let seeded = PopulationBuilder::new(&config.population, config.region.bounds(), seed)
                    .with_comorbidity(config.disease.comorbidity.clone())
                    .build()?;
                (seeded.population, seeded.seeds)
            }
        };
        let rngs = AgentRngs::new(population.len(), seed);

        let environment = Environment::from_config(&config.region, &config.environment)?;
        let transmission = TransmissionModel::new(&config.disease, &config.environment)?;
        for &id in &seeds {
            transmission.seed_infection(&mut population, id, Tick::ZERO)?;
        }

        let mut recorder = StatisticsRecorder::new();
        recorder.record(StatisticsRecorder::sample(Tick::ZERO, &population, &environment));
        tracing::debug!(agents = population.len(), seeds = seeds.len(), seed, "simulation built");

        Ok(Sim {
            clock: SimClock::new(),
            config,
            population,
            rngs,
            environment,
            policy: self.policy,
            transmission,
            index: self.index,
            recorder,
            cleared_at: None,
            reported_initial: false,
        })
    }
}
