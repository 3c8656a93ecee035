//! The transmission model: exposure rolls, disease progression, shedding.

use epi_agent::{Agent, HealthState, Population};
use epi_core::{AgentId, AgentRng, DiseaseConfig, EnvironmentConfig, EpiResult, Tick};
use epi_spatial::{Environment, SpatialResult};

use crate::probability::{checked_probability, contact_probability, environmental_probability};
use crate::DiseaseModel;

/// Route by which a susceptible agent was exposed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExposureChannel {
    /// Proximity to an Infectious agent.
    Contact,
    /// Contamination at the agent's cell.
    Environment,
}

impl ExposureChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            ExposureChannel::Contact => "contact",
            ExposureChannel::Environment => "environment",
        }
    }
}

impl std::fmt::Display for ExposureChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A health change decided for one agent this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// S → E; incubation ends at `until`.
    Expose { channel: ExposureChannel, until: Tick },
    /// E → I; the infectious period ends at `until`.
    Onset { until: Tick },
    /// I → R.
    Recover,
    /// I → D.
    Die,
}

impl Transition {
    pub fn target(self) -> HealthState {
        match self {
            Transition::Expose { .. } => HealthState::Exposed,
            Transition::Onset { .. } => HealthState::Infectious,
            Transition::Recover => HealthState::Recovered,
            Transition::Die => HealthState::Deceased,
        }
    }

    fn until(self) -> Option<Tick> {
        match self {
            Transition::Expose { until, .. } | Transition::Onset { until } => Some(until),
            Transition::Recover | Transition::Die => None,
        }
    }
}

/// Output of [`TransmissionModel::plan`] for one agent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Planned {
    pub transition: Option<Transition>,
    /// Probabilities that had to be clamped while planning.
    pub clamped: u32,
}

/// What [`TransmissionModel::commit`] changed this tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransmissionTally {
    pub exposed_by_contact:     usize,
    pub exposed_by_environment: usize,
    pub became_infectious:      usize,
    pub recovered:              usize,
    pub died:                   usize,
    pub clamped_probabilities:  u32,
}

impl TransmissionTally {
    pub fn new_exposures(&self) -> usize {
        self.exposed_by_contact + self.exposed_by_environment
    }
}

/// Dual-channel transmission plus the SEIR(D) clock.
///
/// Built once per run from the disease and environment sections of the
/// config.  Every method is deterministic given the agent's RNG.
#[derive(Clone, Debug)]
pub struct TransmissionModel {
    disease:           DiseaseModel,
    beta:              f64,
    contact_radius:    f64,
    exposure_ticks:    f64,
    pickup_rate:       f64,
    deposit_amount:    f64,
    spread_radius:     u32,
    spread_falloff:    f64,
    cleaning_efficacy: f64,
}

impl TransmissionModel {
    pub fn new(disease: &DiseaseConfig, env: &EnvironmentConfig) -> EpiResult<Self> {
        Ok(Self {
            disease:           DiseaseModel::new(disease)?,
            beta:              disease.base_transmission_rate,
            contact_radius:    disease.contact_radius,
            exposure_ticks:    disease.exposure_ticks,
            pickup_rate:       disease.environmental_pickup_rate,
            deposit_amount:    env.deposit_amount,
            spread_radius:     env.deposit_radius_cells,
            spread_falloff:    env.deposit_falloff,
            cleaning_efficacy: env.cleaning_efficacy,
        })
    }

    #[inline]
    pub fn disease(&self) -> &DiseaseModel {
        &self.disease
    }

    /// Distance within which an Infectious agent counts as a contact.
    #[inline]
    pub fn contact_radius(&self) -> f64 {
        self.contact_radius
    }

    // ── Plan ──────────────────────────────────────────────────────────────

    /// Decide `agent`'s transition for tick `now` from a read-only snapshot.
    ///
    /// `nearby` holds the agents within [`contact_radius`](Self::contact_radius)
    /// of `agent`; only the Infectious ones other than `agent` count.
    ///
    /// - Susceptible: one contact draw and one environmental draw, both always
    ///   taken; exposed if either succeeds.  The channel is `Contact` when the
    ///   contact draw succeeded.
    /// - Exposed / Infectious: the timed transition fires once `now` reaches
    ///   `transition_at`.  Infectious agents then make one mortality draw.
    pub fn plan(
        &self,
        agent:      &Agent,
        nearby:     &[AgentId],
        population: &Population,
        env:        &Environment,
        now:        Tick,
        rng:        &mut AgentRng,
    ) -> Planned {
        let mut clamped = 0;
        let transition = match agent.health() {
            HealthState::Susceptible => {
                let contacts = nearby
                    .iter()
                    .filter(|&&id| id != agent.id)
                    .filter_map(|&id| population.get(id).ok())
                    .filter(|other| other.health() == HealthState::Infectious)
                    .count();
                let p_contact = checked_probability(
                    contact_probability(self.beta, contacts, self.exposure_ticks),
                    "contact",
                    agent.id,
                    &mut clamped,
                );
                let p_env = checked_probability(
                    environmental_probability(self.pickup_rate, env.sample(agent.position)),
                    "environment",
                    agent.id,
                    &mut clamped,
                );
                let by_contact = rng.gen_bool(p_contact);
                let by_env = rng.gen_bool(p_env);
                if by_contact || by_env {
                    let channel = if by_contact {
                        ExposureChannel::Contact
                    } else {
                        ExposureChannel::Environment
                    };
                    let until = now + self.disease.incubation_ticks(rng);
                    Some(Transition::Expose { channel, until })
                } else {
                    None
                }
            }
            HealthState::Exposed if agent.transition_due(now) => {
                let until = now + self.disease.infectious_ticks(&agent.demographics);
                Some(Transition::Onset { until })
            }
            HealthState::Infectious if agent.transition_due(now) => {
                let p_death = checked_probability(
                    self.disease.mortality(&agent.demographics),
                    "mortality",
                    agent.id,
                    &mut clamped,
                );
                if rng.gen_bool(p_death) {
                    Some(Transition::Die)
                } else {
                    Some(Transition::Recover)
                }
            }
            _ => None,
        };
        Planned { transition, clamped }
    }

    // ── Commit ────────────────────────────────────────────────────────────

    /// Apply one [`Planned`] per agent (indexed by `AgentId`) at tick `now`.
    pub fn commit(
        &self,
        population: &mut Population,
        planned:    &[Planned],
        now:        Tick,
    ) -> EpiResult<TransmissionTally> {
        let mut tally = TransmissionTally::default();
        for (i, plan) in planned.iter().enumerate() {
            tally.clamped_probabilities += plan.clamped;
            let Some(transition) = plan.transition else { continue };
            let id = AgentId(i as u32);
            population.transition(id, transition.target(), now, transition.until())?;
            match transition {
                Transition::Expose { channel: ExposureChannel::Contact, .. } => {
                    tally.exposed_by_contact += 1;
                }
                Transition::Expose { channel: ExposureChannel::Environment, .. } => {
                    tally.exposed_by_environment += 1;
                }
                Transition::Onset { .. } => tally.became_infectious += 1,
                Transition::Recover => tally.recovered += 1,
                Transition::Die => tally.died += 1,
            }
        }
        if tally.new_exposures() > 0 || tally.recovered + tally.died > 0 {
            tracing::debug!(
                tick = %now,
                contact = tally.exposed_by_contact,
                environment = tally.exposed_by_environment,
                onset = tally.became_infectious,
                recovered = tally.recovered,
                died = tally.died,
                "transitions committed"
            );
        }
        Ok(tally)
    }

    // ── Shed ──────────────────────────────────────────────────────────────

    /// Write this tick's contamination and cleaning into `env`.
    ///
    /// Every Infectious agent first deposits `deposit_amount · (1 − cleaning)`
    /// around its position; then every alive agent with a cleaning propensity
    /// removes `cleaning · cleaning_efficacy` around its own.  Both spread
    /// over the same taxicab neighbourhood.
    pub fn shed(&self, population: &Population, env: &mut Environment) -> SpatialResult<()> {
        for agent in population.agents() {
            if agent.health() == HealthState::Infectious {
                let amount = self.deposit_amount * (1.0 - agent.profile.cleaning_propensity);
                env.deposit_area(agent.position, amount, self.spread_radius, self.spread_falloff)?;
            }
        }
        for agent in population.agents() {
            let cleaning = agent.profile.cleaning_propensity;
            if agent.is_alive() && cleaning > 0.0 {
                env.clean_area(
                    agent.position,
                    cleaning * self.cleaning_efficacy,
                    self.spread_radius,
                    self.spread_falloff,
                )?;
            }
        }
        Ok(())
    }

    // ── Seeding ───────────────────────────────────────────────────────────

    /// Move a Susceptible agent straight to Infectious at `now`, with its
    /// infectious period set from its demographics.
    pub fn seed_infection(&self, population: &mut Population, id: AgentId, now: Tick) -> EpiResult<()> {
        let agent = population.get(id)?;
        let until = now + self.disease.infectious_ticks(&agent.demographics);
        population.transition(id, HealthState::Infectious, now, Some(until))
    }
}
