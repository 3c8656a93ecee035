//! Per-agent behaviour profile.

use epi_core::{EpiError, EpiResult};

/// How an individual moves, keeps distance, and cleans.  Fixed at creation.
///
/// All three values lie in `[0, 1]`; higher means more of the behaviour.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BehaviorProfile {
    /// Scale of the random-walk component of movement.
    pub mobility_randomness: f64,
    /// Strength of steering away from neighbours and contaminated cells.
    pub avoidance_propensity: f64,
    /// Fraction of own shedding suppressed, and strength of surface cleaning.
    pub cleaning_propensity: f64,
}

impl BehaviorProfile {
    pub fn new(mobility: f64, avoidance: f64, cleaning: f64) -> EpiResult<Self> {
        for (name, v) in [
            ("mobility_randomness", mobility),
            ("avoidance_propensity", avoidance),
            ("cleaning_propensity", cleaning),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(EpiError::Config(format!("{name} = {v} is outside [0, 1]")));
            }
        }
        Ok(Self {
            mobility_randomness:  mobility,
            avoidance_propensity: avoidance,
            cleaning_propensity:  cleaning,
        })
    }
}
