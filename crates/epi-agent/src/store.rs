//! Agent storage: `Population` (agent records + counts) and `AgentRngs`
//! (per-agent RNG).
//!
//! # Why two structs?
//!
//! The per-agent phases need `&mut AgentRngs` (exclusive mutable access to
//! each agent's RNG) and `&Population` (shared read access to everyone's
//! state) simultaneously.  Rust's borrow checker forbids this if both live
//! inside a single struct.  Keeping RNGs in a separate `AgentRngs` struct
//! resolves the conflict cleanly:
//!
//! ```ignore
//! let population: &Population = &sim.population;
//! let moves = population
//!     .agents()
//!     .iter()
//!     .zip(sim.rngs.inner.iter_mut())
//!     .map(|(agent, rng)| policy.plan_move(agent, &neighbors, &ctx, rng))
//!     .collect::<Vec<_>>();
//! ```

use epi_core::{AgentId, AgentRng, Bounds, EpiError, EpiResult, Tick, Vec2};

use crate::{Agent, HealthState, StateCounts};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`Population`] to enable
/// simultaneous `&mut AgentRngs` + `&Population` borrows.
///
/// Each agent's stream is only ever borrowed mutably alongside that agent,
/// via `inner.iter_mut()` or Rayon's `par_iter_mut()`.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── Population ────────────────────────────────────────────────────────────────

/// The ordered collection of agents plus per-state bookkeeping.
///
/// `agents()[id.index()]` is always the agent with that `AgentId`; the order
/// is fixed at creation so iteration is reproducible.  Counts are maintained
/// incrementally by [`transition`](Self::transition) and can be re-derived
/// with [`verify_counts`](Self::verify_counts).
pub struct Population {
    agents: Vec<Agent>,
    counts: StateCounts,
    bounds: Bounds,
}

impl Population {
    /// Wrap pre-built agents.  Agent `i` must carry `AgentId(i)` and lie
    /// inside `bounds`.
    pub fn new(agents: Vec<Agent>, bounds: Bounds) -> EpiResult<Self> {
        for (i, a) in agents.iter().enumerate() {
            if a.id.index() != i {
                return Err(EpiError::Invariant(format!(
                    "agent at index {i} carries id {}",
                    a.id
                )));
            }
            if !bounds.contains(a.position) {
                return Err(EpiError::Invariant(format!(
                    "{} starts outside the region at {}",
                    a.id, a.position
                )));
            }
        }
        let counts = StateCounts::tally(agents.iter().map(Agent::health));
        Ok(Self { agents, counts, bounds })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[inline]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn get(&self, id: AgentId) -> EpiResult<&Agent> {
        self.agents.get(id.index()).ok_or(EpiError::AgentNotFound(id))
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.agents.len() as u32).map(AgentId)
    }

    #[inline]
    pub fn counts(&self) -> StateCounts {
        self.counts
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// `true` while any agent is Exposed or Infectious.
    #[inline]
    pub fn has_active_infections(&self) -> bool {
        self.counts.active() > 0
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Move `id` to `next`, recording `now` as the entry tick and
    /// `transition_at` as the pending timed transition.
    ///
    /// Returns [`EpiError::Invariant`] for any edge not in the state machine.
    pub fn transition(
        &mut self,
        id:            AgentId,
        next:          HealthState,
        now:           Tick,
        transition_at: Option<Tick>,
    ) -> EpiResult<()> {
        let agent = self
            .agents
            .get_mut(id.index())
            .ok_or(EpiError::AgentNotFound(id))?;
        let current = agent.health();
        if !current.can_transition_to(next) {
            return Err(EpiError::Invariant(format!(
                "illegal transition {current} -> {next} for {id} at {now}"
            )));
        }
        agent.set_health(next, now, transition_at);
        if next == HealthState::Deceased {
            agent.velocity = Vec2::ZERO;
        }
        self.counts.shift(current, next);
        Ok(())
    }

    /// Commit one velocity per agent: integrate, reflect at the region edges,
    /// and clamp.  Deceased agents ignore their entry and stay put.
    pub fn apply_moves(&mut self, velocities: &[Vec2]) -> EpiResult<()> {
        if velocities.len() != self.agents.len() {
            return Err(EpiError::Invariant(format!(
                "{} velocities for {} agents",
                velocities.len(),
                self.agents.len()
            )));
        }
        for (agent, &vel) in self.agents.iter_mut().zip(velocities) {
            if !agent.is_alive() {
                agent.velocity = Vec2::ZERO;
                continue;
            }
            if !vel.is_finite() {
                return Err(EpiError::Invariant(format!(
                    "non-finite velocity {vel} for {}",
                    agent.id
                )));
            }
            let (pos, vel) = self.bounds.reflect(agent.position + vel, vel);
            agent.position = pos;
            agent.velocity = vel;
        }
        Ok(())
    }

    /// Re-count states from scratch and compare with the maintained counts.
    pub fn verify_counts(&self) -> EpiResult<()> {
        let recount = StateCounts::tally(self.agents.iter().map(Agent::health));
        if recount != self.counts || recount.total() != self.agents.len() {
            return Err(EpiError::Invariant(format!(
                "state counts drifted: maintained {:?}, actual {:?}",
                self.counts, recount
            )));
        }
        Ok(())
    }
}
