//! Read-only simulation state passed to every policy callback.

use epi_agent::Population;
use epi_core::{BehaviorConfig, Tick};
use epi_spatial::Environment;

/// A read-only snapshot of the world passed to every
/// [`BehaviorPolicy`][crate::BehaviorPolicy] call during one movement phase.
///
/// All borrows live for the duration of the phase.  epi-sim never allows
/// mutable access to these structures while a `TickContext` is live, so every
/// agent plans against the same pre-move state.
pub struct TickContext<'a> {
    /// Tick being computed.
    pub tick: Tick,

    /// Every agent's position, health, and profile as of the start of the
    /// phase.
    pub population: &'a Population,

    /// The contamination field as of the start of the phase.
    pub environment: &'a Environment,

    pub config: &'a BehaviorConfig,
}

impl<'a> TickContext<'a> {
    #[inline]
    pub fn new(
        tick:        Tick,
        population:  &'a Population,
        environment: &'a Environment,
        config:      &'a BehaviorConfig,
    ) -> Self {
        Self { tick, population, environment, config }
    }
}
