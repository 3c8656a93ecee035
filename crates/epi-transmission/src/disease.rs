//! Disease natural history: how long each stage lasts and how it ends.

use rand_distr::Gamma;

use epi_agent::Demographics;
use epi_core::{AgentRng, DiseaseConfig, DurationModel, EpiError, EpiResult, MortalityTable};

/// A duration model ready to sample.  The `Gamma` distribution is built once.
#[derive(Clone, Debug)]
pub enum DurationSampler {
    Fixed(u64),
    Gamma(Gamma<f64>),
}

impl DurationSampler {
    pub fn new(model: &DurationModel) -> EpiResult<Self> {
        match *model {
            DurationModel::Fixed { ticks } => Ok(Self::Fixed(ticks.max(1))),
            DurationModel::Gamma { shape, scale } => Gamma::new(shape, scale)
                .map(Self::Gamma)
                .map_err(|e| EpiError::Config(format!("gamma duration ({shape}, {scale}): {e}"))),
        }
    }

    /// Whole ticks, rounded up, at least 1.
    pub fn sample_ticks(&self, rng: &mut AgentRng) -> u64 {
        match self {
            Self::Fixed(ticks) => *ticks,
            Self::Gamma(dist) => {
                let x: f64 = rng.sample(dist);
                if x.is_finite() { (x.ceil() as u64).max(1) } else { 1 }
            }
        }
    }
}

/// Incubation, infectious period, and outcome for one disease.
#[derive(Clone, Debug)]
pub struct DiseaseModel {
    incubation:       DurationSampler,
    infectious_short: u64,
    infectious_long:  u64,
    mortality:        MortalityTable,
}

impl DiseaseModel {
    pub fn new(cfg: &DiseaseConfig) -> EpiResult<Self> {
        Ok(Self {
            incubation:       DurationSampler::new(&cfg.incubation)?,
            infectious_short: cfg.infectious_ticks_short.max(1),
            infectious_long:  cfg.infectious_ticks_long.max(1),
            mortality:        cfg.mortality.clone(),
        })
    }

    /// Draw an incubation period for a newly exposed agent.
    #[inline]
    pub fn incubation_ticks(&self, rng: &mut AgentRng) -> u64 {
        self.incubation.sample_ticks(rng)
    }

    /// Length of the infectious period, fixed by the agent's demographics.
    #[inline]
    pub fn infectious_ticks(&self, who: &Demographics) -> u64 {
        if who.long_illness { self.infectious_long } else { self.infectious_short }
    }

    /// Probability that an infection ends in death, before any range check:
    /// `scale · max(age_band_rate, comorbidity_rate if comorbid)`.
    pub fn mortality(&self, who: &Demographics) -> f64 {
        let t = &self.mortality;
        let age_rate = t
            .bands
            .iter()
            .find(|b| who.age_years < b.below_age)
            .map_or(t.oldest_rate, |b| b.rate);
        let rate = if who.comorbid { age_rate.max(t.comorbidity_rate) } else { age_rate };
        rate * t.scale
    }
}
