//! Age and pre-existing-condition draws.
//!
//! Age drives two things downstream: the probability of a pre-existing
//! condition (and with it a long infectious period), and the mortality band
//! used by the transmission model.  Both are fixed at creation.

use rand_distr::{Normal, WeightedIndex};

use epi_core::config::MAX_AGE_YEARS;
use epi_core::{AgeModel, ComorbidityModel, EpiError, EpiResult, SimRng};

/// Rejection-sampling attempts before a normal age draw is clamped instead.
const MAX_AGE_REJECTIONS: usize = 1_000;

/// Fixed demographic attributes of one agent.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Demographics {
    pub age_years: f64,
    /// Pre-existing condition.
    pub comorbid: bool,
    /// Whether an infection would run the long infectious period.
    pub long_illness: bool,
}

impl Demographics {
    pub fn new(age_years: f64, comorbid: bool, long_illness: bool) -> Self {
        Self { age_years, comorbid, long_illness }
    }

    /// Draw age from `age`, then comorbidity and illness length from the
    /// age-dependent risk curve.
    ///
    /// Agents without a comorbidity get a second roll at the same risk for a
    /// long illness.
    pub fn draw(age: &AgeModel, risk: &ComorbidityModel, rng: &mut SimRng) -> EpiResult<Self> {
        let age_years = draw_age(age, rng)?;
        let p = erlang_cdf(risk.shape, risk.scale, age_years);
        let comorbid = rng.gen_bool(p);
        let long_illness = comorbid || rng.gen_bool(p);
        Ok(Self { age_years, comorbid, long_illness })
    }
}

/// Draw one age in years from `model`.
pub fn draw_age(model: &AgeModel, rng: &mut SimRng) -> EpiResult<f64> {
    match model {
        AgeModel::Pyramid { bin_years, weights } => {
            let bins = WeightedIndex::new(weights)
                .map_err(|e| EpiError::Config(format!("age pyramid: {e}")))?;
            let bin = rng.sample(&bins) as f64;
            let within: f64 = rng.random();
            Ok((bin_years * bin + (bin_years - 1.0).max(0.0) * within).min(MAX_AGE_YEARS))
        }
        AgeModel::Normal { mean, sd } => {
            let dist = Normal::new(*mean, *sd)
                .map_err(|e| EpiError::Config(format!("age distribution: {e}")))?;
            let mut age: f64 = rng.sample(&dist);
            for _ in 0..MAX_AGE_REJECTIONS {
                if (0.0..=MAX_AGE_YEARS).contains(&age) {
                    return Ok(age);
                }
                age = rng.sample(&dist);
            }
            Ok(age.clamp(0.0, MAX_AGE_YEARS))
        }
    }
}

/// CDF of the Erlang distribution (a gamma distribution with integer shape):
///
///   P(X ≤ x) = 1 − e^(−x/θ) · Σ_{i<k} (x/θ)^i / i!
///
/// Returns 0 for `x ≤ 0`.
pub fn erlang_cdf(shape: u32, scale: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    let lambda_x = x / scale;
    let mut term = 1.0;
    let mut sum = 1.0;
    for i in 1..shape {
        term *= lambda_x / i as f64;
        sum += term;
    }
    (1.0 - (-lambda_x).exp() * sum).clamp(0.0, 1.0)
}
