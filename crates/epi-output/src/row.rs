//! Flat row types written by output backends.

use epi_sim::{AgentSnapshot, TickRecord};

/// One line of `tick_records.csv`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRecordRow {
    pub tick:                      u64,
    pub susceptible:               u64,
    pub exposed:                   u64,
    pub infectious:                u64,
    pub recovered:                 u64,
    pub deceased:                  u64,
    pub total_contamination:       f64,
    pub contaminated_cells:        u64,
    pub new_contact_exposures:     u64,
    pub new_environment_exposures: u64,
    pub new_infectious:            u64,
    pub new_recoveries:            u64,
    pub new_deaths:                u64,
    pub clamped_probabilities:     u32,
}

impl TickRecordRow {
    pub const HEADER: [&'static str; 14] = [
        "tick",
        "susceptible",
        "exposed",
        "infectious",
        "recovered",
        "deceased",
        "total_contamination",
        "contaminated_cells",
        "new_contact_exposures",
        "new_environment_exposures",
        "new_infectious",
        "new_recoveries",
        "new_deaths",
        "clamped_probabilities",
    ];
}

impl From<&TickRecord> for TickRecordRow {
    fn from(r: &TickRecord) -> Self {
        Self {
            tick:                      r.tick.0,
            susceptible:               r.susceptible as u64,
            exposed:                   r.exposed as u64,
            infectious:                r.infectious as u64,
            recovered:                 r.recovered as u64,
            deceased:                  r.deceased as u64,
            total_contamination:       r.total_contamination,
            contaminated_cells:        r.contaminated_cells as u64,
            new_contact_exposures:     r.new_contact_exposures as u64,
            new_environment_exposures: r.new_environment_exposures as u64,
            new_infectious:            r.new_infectious as u64,
            new_recoveries:            r.new_recoveries as u64,
            new_deaths:                r.new_deaths as u64,
            clamped_probabilities:     r.clamped_probabilities,
        }
    }
}

/// One line of `agent_snapshots.csv`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub tick:      u64,
    pub agent_id:  u32,
    pub x:         f64,
    pub y:         f64,
    pub vx:        f64,
    pub vy:        f64,
    /// Lowercase state name, e.g. `"infectious"`.
    pub health:    &'static str,
    pub age_years: f64,
    pub comorbid:  bool,
}

impl AgentSnapshotRow {
    pub const HEADER: [&'static str; 9] =
        ["tick", "agent_id", "x", "y", "vx", "vy", "health", "age_years", "comorbid"];
}

impl From<&AgentSnapshot> for AgentSnapshotRow {
    fn from(s: &AgentSnapshot) -> Self {
        Self {
            tick:      s.tick.0,
            agent_id:  s.agent_id.0,
            x:         s.x,
            y:         s.y,
            vx:        s.vx,
            vy:        s.vy,
            health:    s.health.as_str(),
            age_years: s.age_years,
            comorbid:  s.comorbid,
        }
    }
}
