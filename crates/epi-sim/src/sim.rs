//! The `Sim` struct and its tick loop.

use epi_agent::{Agent, AgentRngs, HealthState, Population};
use epi_behavior::{BehaviorPolicy, TickContext};
use epi_core::{AgentId, AgentRng, EpiConfig, EpiError, SimClock, Tick, Vec2};
use epi_spatial::{Environment, NeighborIndex};
use epi_transmission::{Planned, TransmissionModel, TransmissionTally};

use crate::{AgentSnapshot, SimError, SimObserver, SimResult, StatisticsRecorder, TickRecord, TimeSeries};

/// Slack allowed on `|velocity| <= max_speed` for floating-point rounding.
const SPEED_TOLERANCE: f64 = 1e-9;

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<B, I>` holds all simulation state and drives the tick loop described
/// in the [crate docs](crate).  Every per-agent decision is computed from a
/// snapshot and committed afterwards, so the order in which agents are
/// visited never matters.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<B: BehaviorPolicy, I: NeighborIndex> {
    /// Run configuration (validated by the builder).
    pub config: EpiConfig,

    pub clock: SimClock,

    /// Agent records and per-state counts.
    pub population: Population,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    pub environment: Environment,

    /// Movement rule.  Called once per alive agent per tick.
    pub policy: B,

    pub transmission: TransmissionModel,

    /// Neighbour index, rebuilt from alive agents before each phase.
    pub(crate) index: I,

    pub(crate) recorder: StatisticsRecorder,

    /// First tick with no Exposed/Infectious agents in the current quiet
    /// stretch.
    pub(crate) cleared_at: Option<Tick>,

    /// Whether the tick-0 record has gone to an observer.
    pub(crate) reported_initial: bool,
}

impl<B: BehaviorPolicy, I: NeighborIndex> Sim<B, I> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Step until the stop condition holds and return the full time series.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TimeSeries> {
        tracing::info!(
            agents = self.population.len(),
            seed = self.config.run.seed,
            max_ticks = self.config.run.max_ticks,
            "run starting"
        );
        self.report_initial(observer);
        while self.clock.is_running() {
            self.step_observed(observer)?;
        }
        let now = self.clock.current_tick;
        observer.on_sim_end(now);

        let series = self.recorder.series();
        let last = series.final_record().cloned().unwrap_or_default();
        tracing::info!(
            final_tick = %now,
            ever_infected = series.ever_infected(),
            recovered = last.recovered,
            deceased = last.deceased,
            peak_infectious = series.peak_infectious().map_or(0, |(_, n)| n),
            "run finished"
        );
        Ok(series.clone())
    }

    /// Run at most `n` ticks, stopping early if the stop condition is met.
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        self.report_initial(observer);
        for _ in 0..n {
            if !self.clock.is_running() {
                break;
            }
            self.step_observed(observer)?;
        }
        Ok(())
    }

    /// Advance one tick and return its record.
    ///
    /// Fails with [`SimError::Stopped`] once the run has ended.
    pub fn step(&mut self) -> SimResult<TickRecord> {
        let stopped = SimError::Stopped(self.clock.current_tick);
        let now = self.clock.advance().ok_or(stopped)?;

        let tally = self.apply_policy_and_transmission(now)?;
        self.transmission.shed(&self.population, &mut self.environment)?;
        self.environment.decay(self.config.environment.decay_factor)?;
        self.check_invariants()?;

        let record = StatisticsRecorder::sample(now, &self.population, &self.environment)
            .with_flows(&tally);
        self.recorder.record(record.clone());
        tracing::debug!(
            tick = %now,
            s = record.susceptible,
            e = record.exposed,
            i = record.infectious,
            r = record.recovered,
            d = record.deceased,
            contamination = record.total_contamination,
            "tick"
        );

        self.update_stop(now);
        Ok(record)
    }

    /// Movement for every agent, then transmission for every agent.
    ///
    /// Each half plans against a snapshot and commits afterwards: moves are
    /// computed from pre-move positions, exposure and progression from
    /// post-move positions and the field as it stood before this tick's
    /// shedding.
    pub fn apply_policy_and_transmission(&mut self, now: Tick) -> SimResult<TransmissionTally> {
        self.rebuild_index();
        let velocities = self.plan_moves(now);
        self.population.apply_moves(&velocities)?;

        self.rebuild_index();
        let planned = self.plan_transmission(now);
        Ok(self.transmission.commit(&mut self.population, &planned, now)?)
    }

    /// Every agent's current state.
    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        AgentSnapshot::capture(self.clock.current_tick, &self.population)
    }

    /// Records so far, starting with the initial state at tick 0.
    pub fn series(&self) -> &TimeSeries {
        self.recorder.series()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    // ── Tick plumbing ─────────────────────────────────────────────────────

    fn step_observed<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let record = self.step()?;
        observer.on_tick_end(&record);
        self.maybe_snapshot(record.tick, observer);
        Ok(())
    }

    fn report_initial<O: SimObserver>(&mut self, observer: &mut O) {
        if self.reported_initial {
            return;
        }
        self.reported_initial = true;
        if let Some(first) = self.recorder.series().records().first() {
            observer.on_tick_end(first);
        }
        self.maybe_snapshot(self.clock.current_tick, observer);
    }

    fn maybe_snapshot<O: SimObserver>(&self, now: Tick, observer: &mut O) {
        let interval = self.config.run.snapshot_interval_ticks;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_snapshot(now, &self.population, &self.environment);
        }
    }

    /// Stop at `max_ticks`, or once the outbreak has been over for
    /// `extra_ticks_after_clear` ticks.
    fn update_stop(&mut self, now: Tick) {
        let run = &self.config.run;
        if now.0 >= run.max_ticks {
            tracing::info!(tick = %now, "reached max_ticks");
            self.clock.stop();
            return;
        }
        if self.population.has_active_infections() {
            self.cleared_at = None;
            return;
        }
        let cleared = *self.cleared_at.get_or_insert(now);
        if now.since(cleared) >= run.extra_ticks_after_clear {
            tracing::info!(tick = %now, cleared_at = %cleared, "outbreak cleared");
            self.clock.stop();
        }
    }

    fn rebuild_index(&mut self) {
        let points: Vec<(AgentId, Vec2)> = self
            .population
            .agents()
            .iter()
            .filter(|a| a.is_alive())
            .map(|a| (a.id, a.position))
            .collect();
        self.index.rebuild(&points);
    }

    fn check_invariants(&self) -> SimResult<()> {
        self.population.verify_counts()?;
        let bounds = self.population.bounds();
        let max_speed = self.config.behavior.max_speed;
        for a in self.population.agents() {
            if !bounds.contains(a.position) {
                return Err(EpiError::Invariant(format!("{} left the region at {}", a.id, a.position)).into());
            }
            if a.velocity.length() > max_speed + SPEED_TOLERANCE {
                return Err(EpiError::Invariant(format!(
                    "{} moves at {} > max_speed {max_speed}",
                    a.id,
                    a.velocity.length()
                ))
                .into());
            }
        }
        self.environment.check_invariants()?;
        Ok(())
    }

    // ── Planning phases ───────────────────────────────────────────────────

    /// One velocity per agent from the current (pre-move) snapshot.
    ///
    /// With the `parallel` Cargo feature the policy runs on Rayon's thread
    /// pool; each agent only touches its own RNG so the result is identical.
    fn plan_moves(&mut self, now: Tick) -> Vec<Vec2> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let population = &self.population;
        let policy     = &self.policy;
        let index      = &self.index;
        let rngs       = &mut self.rngs;
        let ctx = TickContext::new(now, population, &self.environment, &self.config.behavior);
        let radius = ctx.config.sensing_radius;

        let plan_one = |buf: &mut Vec<AgentId>, agent: &Agent, rng: &mut AgentRng| {
            if !agent.is_alive() {
                return Vec2::ZERO;
            }
            index.within(agent.position, radius, buf);
            buf.retain(|&id| id != agent.id);
            policy.plan_move(agent, buf, &ctx, rng)
        };

        #[cfg(not(feature = "parallel"))]
        {
            let mut buf = Vec::new();
            population
                .agents()
                .iter()
                .zip(rngs.inner.iter_mut())
                .map(|(agent, rng)| plan_one(&mut buf, agent, rng))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            population
                .agents()
                .par_iter()
                .zip(rngs.inner.par_iter_mut())
                .map_init(Vec::new, |buf, (agent, rng)| plan_one(buf, agent, rng))
                .collect()
        }
    }

    /// One [`Planned`] transition per agent from the post-move snapshot.
    fn plan_transmission(&mut self, now: Tick) -> Vec<Planned> {
        let population   = &self.population;
        let environment  = &self.environment;
        let transmission = &self.transmission;
        let index        = &self.index;
        let rngs         = &mut self.rngs;
        let radius = transmission.contact_radius();

        let plan_one = |buf: &mut Vec<AgentId>, agent: &Agent, rng: &mut AgentRng| {
            buf.clear();
            if agent.health() == HealthState::Susceptible {
                index.within(agent.position, radius, buf);
            }
            transmission.plan(agent, buf, population, environment, now, rng)
        };

        #[cfg(not(feature = "parallel"))]
        {
            let mut buf = Vec::new();
            population
                .agents()
                .iter()
                .zip(rngs.inner.iter_mut())
                .map(|(agent, rng)| plan_one(&mut buf, agent, rng))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            population
                .agents()
                .par_iter()
                .zip(rngs.inner.par_iter_mut())
                .map_init(Vec::new, |buf, (agent, rng)| plan_one(buf, agent, rng))
                .collect()
        }
    }
}
