//! Per-tick infection probabilities.
//!
//! Both channels reduce to a single probability per susceptible agent per
//! tick, so each costs exactly one Bernoulli draw.

use epi_core::AgentId;

/// Probability of infection from `contacts` Infectious agents within the
/// contact radius, each credited `exposure_ticks` of exposure:
///
/// ```text
/// p = 1 − (1 − β)^(contacts · exposure_ticks)
/// ```
///
/// This is the chance that at least one of the independent per-contact
/// trials succeeds.
pub fn contact_probability(beta: f64, contacts: usize, exposure_ticks: f64) -> f64 {
    if contacts == 0 {
        return 0.0;
    }
    1.0 - (1.0 - beta).powf(contacts as f64 * exposure_ticks)
}

/// Probability of picking up an infection from the contamination under the
/// agent, saturating at 1.
pub fn environmental_probability(pickup_rate: f64, intensity: f64) -> f64 {
    (pickup_rate * intensity).min(1.0)
}

/// Return `p` if it is a probability; otherwise clamp it into `[0, 1]`
/// (NaN becomes 0), log a warning, and bump `clamped`.
pub fn checked_probability(p: f64, what: &'static str, agent: AgentId, clamped: &mut u32) -> f64 {
    if (0.0..=1.0).contains(&p) {
        return p;
    }
    *clamped += 1;
    let fixed = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    tracing::warn!(%agent, what, value = p, clamped_to = fixed, "probability out of range");
    fixed
}
