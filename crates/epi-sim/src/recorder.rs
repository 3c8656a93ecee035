//! Per-tick statistics.

use epi_agent::Population;
use epi_core::Tick;
use epi_spatial::Environment;
use epi_transmission::TransmissionTally;

/// Aggregate state of the run at the end of one tick.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickRecord {
    pub tick: Tick,

    pub susceptible: usize,
    pub exposed:     usize,
    pub infectious:  usize,
    pub recovered:   usize,
    pub deceased:    usize,

    /// Sum of every cell's contamination.
    pub total_contamination: f64,
    /// Cells currently holding contamination.
    pub contaminated_cells: usize,

    // Flows during this tick.
    pub new_contact_exposures:     usize,
    pub new_environment_exposures: usize,
    pub new_infectious:            usize,
    pub new_recoveries:            usize,
    pub new_deaths:                usize,
    /// Probabilities clamped into [0, 1] this tick.
    pub clamped_probabilities:     u32,
}

impl TickRecord {
    /// Attach this tick's flows.
    pub fn with_flows(mut self, tally: &TransmissionTally) -> Self {
        self.new_contact_exposures = tally.exposed_by_contact;
        self.new_environment_exposures = tally.exposed_by_environment;
        self.new_infectious = tally.became_infectious;
        self.new_recoveries = tally.recovered;
        self.new_deaths = tally.died;
        self.clamped_probabilities = tally.clamped_probabilities;
        self
    }

    pub fn population(&self) -> usize {
        self.susceptible + self.exposed + self.infectious + self.recovered + self.deceased
    }

    /// Agents that have left Susceptible by the end of this tick.
    pub fn ever_infected(&self) -> usize {
        self.exposed + self.infectious + self.recovered + self.deceased
    }

    pub fn new_exposures(&self) -> usize {
        self.new_contact_exposures + self.new_environment_exposures
    }
}

/// Every [`TickRecord`] of a run, in tick order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSeries {
    records: Vec<TickRecord>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TickRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TickRecord> {
        self.records.iter()
    }

    /// Highest Infectious count and the first tick it was reached.
    pub fn peak_infectious(&self) -> Option<(Tick, usize)> {
        self.records
            .iter()
            .fold(None, |best: Option<&TickRecord>, r| match best {
                Some(b) if b.infectious >= r.infectious => Some(b),
                _ => Some(r),
            })
            .map(|r| (r.tick, r.infectious))
    }

    pub fn final_record(&self) -> Option<&TickRecord> {
        self.records.last()
    }

    /// Agents infected at any point, including the initial seeds.
    pub fn ever_infected(&self) -> usize {
        self.final_record().map_or(0, TickRecord::ever_infected)
    }

    /// Total exposures via each channel over the run: `(contact, environment)`.
    pub fn exposures_by_channel(&self) -> (usize, usize) {
        self.records.iter().fold((0, 0), |(c, e), r| {
            (c + r.new_contact_exposures, e + r.new_environment_exposures)
        })
    }

    fn push(&mut self, record: TickRecord) {
        self.records.push(record);
    }
}

/// Samples the world into [`TickRecord`]s and keeps the [`TimeSeries`].
#[derive(Debug, Default)]
pub struct StatisticsRecorder {
    series: TimeSeries,
}

impl StatisticsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summarise `population` and `environment` at `tick`.  Pure: flows are
    /// zero until [`TickRecord::with_flows`] fills them.
    pub fn sample(tick: Tick, population: &Population, environment: &Environment) -> TickRecord {
        let c = population.counts();
        TickRecord {
            tick,
            susceptible: c.susceptible,
            exposed: c.exposed,
            infectious: c.infectious,
            recovered: c.recovered,
            deceased: c.deceased,
            total_contamination: environment.total_contamination(),
            contaminated_cells: environment.contaminated_cells(),
            ..TickRecord::default()
        }
    }

    pub fn record(&mut self, record: TickRecord) {
        self.series.push(record);
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }
}
