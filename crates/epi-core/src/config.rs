//! Run configuration.
//!
//! `EpiConfig` is everything the engine consumes: region geometry, population
//! size and behaviour-profile ranges, epidemiological constants, contamination
//! physics, and run control.  Reference statistics (age pyramid, age-banded
//! mortality) arrive here as plain numbers; where they come from is the
//! caller's business.
//!
//! Every section implements `Default` with the calibrated values used by the
//! demo scenario.  With the `serde` feature the config loads from any serde
//! format; missing fields take their defaults.
//!
//! Call [`EpiConfig::validate`] before building a simulation.  Invalid values
//! are rejected with [`EpiError::Config`], never silently clamped.

use crate::{EpiError, EpiResult, SimRng, Vec2};

/// 2020 world population pyramid (male), 5-year bins from 0–4 to 100+.
/// Source: populationpyramid.net.
pub const WORLD_PYRAMID_2020: [f64; 21] = [
    349_432_556.0, 342_927_576.0, 331_497_486.0, 316_642_222.0, 308_286_775.0,
    306_059_387.0, 309_236_984.0, 276_447_037.0, 249_389_688.0, 241_232_876.0,
    222_609_691.0, 192_215_395.0, 157_180_267.0, 128_939_392.0,  87_185_982.0,
     54_754_941.0,  33_648_953.0,  15_756_942.0,   5_327_866.0,   1_077_791.0,
        124_144.0,
];

/// Oldest representable age in years.
pub const MAX_AGE_YEARS: f64 = 104.0;

// ── EpiConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EpiConfig {
    pub run:         RunConfig,
    pub region:      RegionConfig,
    pub population:  PopulationConfig,
    pub behavior:    BehaviorConfig,
    pub disease:     DiseaseConfig,
    pub environment: EnvironmentConfig,
}

impl EpiConfig {
    /// Check every section.  Returns the first problem found.
    pub fn validate(&self) -> EpiResult<()> {
        self.run.validate()?;
        self.region.validate()?;
        self.population.validate(&self.region)?;
        self.behavior.validate()?;
        self.disease.validate()?;
        self.environment.validate(&self.region)?;
        Ok(())
    }
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Hard stop: the run ends when the clock reaches this tick.
    pub max_ticks: u64,

    /// Emit an agent snapshot every N ticks.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,

    /// Keep stepping this many ticks after the last Exposed/Infectious agent
    /// resolves, so the tail of the contamination decay is recorded.
    pub extra_ticks_after_clear: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed:                    42,
            max_ticks:               500,
            snapshot_interval_ticks: 0,
            extra_ticks_after_clear: 0,
        }
    }
}

impl RunConfig {
    fn validate(&self) -> EpiResult<()> {
        if self.max_ticks == 0 {
            return Err(config_err("run.max_ticks must be at least 1"));
        }
        Ok(())
    }
}

// ── RegionConfig ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RegionConfig {
    pub width:  f64,
    pub height: f64,
    /// Edge length of one contamination-field cell.
    pub cell_size: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self { width: 1.0, height: 1.0, cell_size: 0.01 }
    }
}

impl RegionConfig {
    pub fn bounds(&self) -> crate::Bounds {
        crate::Bounds::new(self.width, self.height)
    }

    /// Grid size in cells, `(columns, rows)`.
    pub fn grid_dims(&self) -> (u32, u32) {
        let cells = |side: f64| (side / self.cell_size).ceil().max(1.0) as u32;
        (cells(self.width), cells(self.height))
    }

    fn validate(&self) -> EpiResult<()> {
        check_positive("region.width", self.width)?;
        check_positive("region.height", self.height)?;
        check_positive("region.cell_size", self.cell_size)?;
        if self.cell_size > self.width.min(self.height) {
            return Err(config_err(format!(
                "region.cell_size {} exceeds the region's smaller side",
                self.cell_size
            )));
        }
        Ok(())
    }
}

// ── PopulationConfig ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PopulationConfig {
    pub size: usize,

    /// Number of agents that start Infectious at tick 0.
    pub initial_infected: usize,

    /// Optional fixed start positions for the initially infected agents, in
    /// order.  Seeds beyond this list keep their random position; locations
    /// beyond `initial_infected` are ignored.
    pub seed_locations: Vec<Vec2>,

    pub mobility:  UnitRange,
    pub avoidance: UnitRange,
    pub cleaning:  UnitRange,

    /// Whether initially infected agents keep their drawn cleaning propensity.
    /// When `false` they are set to zero, as for the index case in the
    /// reference scenario.
    pub seeds_clean: bool,

    pub age: AgeModel,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size:             100,
            initial_infected: 1,
            seed_locations:   vec![Vec2::new(0.5, 0.5)],
            mobility:         UnitRange::new(0.4, 1.0),
            avoidance:        UnitRange::new(0.0, 0.5),
            cleaning:         UnitRange::new(0.0, 0.3),
            seeds_clean:      false,
            age:              AgeModel::default(),
        }
    }
}

impl PopulationConfig {
    fn validate(&self, region: &RegionConfig) -> EpiResult<()> {
        if self.size == 0 {
            return Err(config_err("population.size must be at least 1"));
        }
        if self.initial_infected > self.size {
            return Err(config_err(format!(
                "population.initial_infected {} exceeds population.size {}",
                self.initial_infected, self.size
            )));
        }
        let bounds = region.bounds();
        if let Some(p) = self.seed_locations.iter().find(|p| !p.is_finite() || !bounds.contains(**p)) {
            return Err(config_err(format!("seed location {p} lies outside the region")));
        }
        self.mobility.validate("population.mobility")?;
        self.avoidance.validate("population.avoidance")?;
        self.cleaning.validate("population.cleaning")?;
        self.age.validate()
    }
}

/// A closed sub-range of `[0, 1]` from which a profile value is drawn uniformly.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitRange {
    pub min: f64,
    pub max: f64,
}

impl UnitRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A degenerate range that always yields `v`.
    pub const fn fixed(v: f64) -> Self {
        Self { min: v, max: v }
    }

    pub fn sample(&self, rng: &mut SimRng) -> f64 {
        if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }

    fn validate(&self, name: &str) -> EpiResult<()> {
        check_unit(&format!("{name}.min"), self.min)?;
        check_unit(&format!("{name}.max"), self.max)?;
        if self.min > self.max {
            return Err(config_err(format!("{name}: min {} > max {}", self.min, self.max)));
        }
        Ok(())
    }
}

/// How agent ages are drawn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum AgeModel {
    /// Weighted choice of a bin, then uniform within the first
    /// `bin_years - 1` years of it.  Weights need not be normalised.
    Pyramid { bin_years: f64, weights: Vec<f64> },
    /// Normal distribution, rejection-sampled into `[0, MAX_AGE_YEARS]`.
    Normal { mean: f64, sd: f64 },
}

impl Default for AgeModel {
    fn default() -> Self {
        AgeModel::Pyramid { bin_years: 5.0, weights: WORLD_PYRAMID_2020.to_vec() }
    }
}

impl AgeModel {
    fn validate(&self) -> EpiResult<()> {
        match self {
            AgeModel::Pyramid { bin_years, weights } => {
                check_positive("population.age.bin_years", *bin_years)?;
                if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(config_err("population.age.weights must be finite and non-negative"));
                }
                if weights.iter().sum::<f64>() <= 0.0 {
                    return Err(config_err("population.age.weights must not all be zero"));
                }
                Ok(())
            }
            AgeModel::Normal { mean, sd } => {
                if !(0.0..=MAX_AGE_YEARS).contains(mean) {
                    return Err(config_err(format!(
                        "population.age.mean {mean} outside [0, {MAX_AGE_YEARS}]"
                    )));
                }
                check_positive("population.age.sd", *sd)
            }
        }
    }
}

// ── BehaviorConfig ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BehaviorConfig {
    /// Radius within which neighbours are sensed for avoidance.
    pub sensing_radius: f64,
    /// Standard deviation of the per-axis random-walk step at
    /// `mobility_randomness = 1`.
    pub random_walk_scale: f64,
    /// Upper bound on the length of any velocity (distance per tick).
    pub max_speed: f64,
    /// Step length of neighbour avoidance at `avoidance_propensity = 1`.
    pub avoidance_strength: f64,
    /// Cells above this intensity repel agents.
    pub contamination_threshold: f64,
    /// Step length of contamination avoidance at `avoidance_propensity = 1`.
    pub contamination_avoidance_strength: f64,
    /// Multiplier on the random walk while Infectious (symptomatic agents
    /// move less).
    pub infectious_mobility_factor: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            sensing_radius:                   0.05,
            random_walk_scale:                0.02,
            max_speed:                        0.05,
            avoidance_strength:               0.02,
            contamination_threshold:          0.1,
            contamination_avoidance_strength: 0.01,
            infectious_mobility_factor:       0.5,
        }
    }
}

impl BehaviorConfig {
    fn validate(&self) -> EpiResult<()> {
        check_non_negative("behavior.sensing_radius", self.sensing_radius)?;
        check_non_negative("behavior.random_walk_scale", self.random_walk_scale)?;
        check_positive("behavior.max_speed", self.max_speed)?;
        check_non_negative("behavior.avoidance_strength", self.avoidance_strength)?;
        check_non_negative("behavior.contamination_threshold", self.contamination_threshold)?;
        check_non_negative(
            "behavior.contamination_avoidance_strength",
            self.contamination_avoidance_strength,
        )?;
        check_unit("behavior.infectious_mobility_factor", self.infectious_mobility_factor)
    }
}

// ── DiseaseConfig ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiseaseConfig {
    /// Per-tick infection probability from one Infectious contact.
    pub base_transmission_rate: f64,
    /// Distance within which an Infectious agent counts as a contact.
    pub contact_radius: f64,
    /// Exposure duration credited per contact per tick.
    pub exposure_ticks: f64,
    /// Infection probability per unit of sampled contamination.
    pub environmental_pickup_rate: f64,
    pub incubation: DurationModel,
    /// Infectious period for agents without elevated risk.
    pub infectious_ticks_short: u64,
    /// Infectious period for comorbid or otherwise high-risk agents.
    pub infectious_ticks_long: u64,
    pub comorbidity: ComorbidityModel,
    pub mortality: MortalityTable,
}

impl Default for DiseaseConfig {
    fn default() -> Self {
        Self {
            base_transmission_rate:    0.15,
            contact_radius:            0.03,
            exposure_ticks:            1.0,
            environmental_pickup_rate: 1.0,
            incubation:                DurationModel::Gamma { shape: 3.0, scale: 2.0 },
            infectious_ticks_short:    14,
            infectious_ticks_long:     28,
            comorbidity:               ComorbidityModel::default(),
            mortality:                 MortalityTable::default(),
        }
    }
}

impl DiseaseConfig {
    fn validate(&self) -> EpiResult<()> {
        check_unit("disease.base_transmission_rate", self.base_transmission_rate)?;
        check_non_negative("disease.contact_radius", self.contact_radius)?;
        check_non_negative("disease.exposure_ticks", self.exposure_ticks)?;
        check_non_negative("disease.environmental_pickup_rate", self.environmental_pickup_rate)?;
        self.incubation.validate("disease.incubation")?;
        if self.infectious_ticks_short == 0 || self.infectious_ticks_long == 0 {
            return Err(config_err("disease infectious periods must be at least 1 tick"));
        }
        self.comorbidity.validate()?;
        self.mortality.validate()
    }
}

/// A duration drawn once when an agent enters a timed state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum DurationModel {
    Fixed { ticks: u64 },
    /// Gamma-distributed, rounded up to whole ticks (minimum 1).
    Gamma { shape: f64, scale: f64 },
}

impl DurationModel {
    fn validate(&self, name: &str) -> EpiResult<()> {
        match self {
            DurationModel::Fixed { ticks } if *ticks == 0 => {
                Err(config_err(format!("{name}: fixed duration must be at least 1 tick")))
            }
            DurationModel::Fixed { .. } => Ok(()),
            DurationModel::Gamma { shape, scale } => {
                check_positive(&format!("{name}.shape"), *shape)?;
                check_positive(&format!("{name}.scale"), *scale)
            }
        }
    }
}

/// Erlang(shape, scale) CDF over age gives the probability of a
/// pre-existing condition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComorbidityModel {
    pub shape: u32,
    pub scale: f64,
}

impl Default for ComorbidityModel {
    fn default() -> Self {
        Self { shape: 12, scale: 4.5 }
    }
}

impl ComorbidityModel {
    fn validate(&self) -> EpiResult<()> {
        if self.shape == 0 {
            return Err(config_err("disease.comorbidity.shape must be at least 1"));
        }
        check_positive("disease.comorbidity.scale", self.scale)
    }
}

/// One age band of the mortality table: applies to ages `< below_age`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MortalityBand {
    pub below_age: f64,
    pub rate:      f64,
}

/// Probability that an infection ends in death, by age band and comorbidity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MortalityTable {
    /// Bands in ascending `below_age` order.
    pub bands: Vec<MortalityBand>,
    /// Rate for ages at or above the last band.
    pub oldest_rate: f64,
    /// Rate for agents with a pre-existing condition (the larger of this and
    /// the age rate applies).
    pub comorbidity_rate: f64,
    /// Calibration multiplier applied to the final rate.
    pub scale: f64,
}

impl Default for MortalityTable {
    fn default() -> Self {
        let band = |below_age, rate| MortalityBand { below_age, rate };
        Self {
            bands: vec![
                band(40.0, 0.002),
                band(50.0, 0.004),
                band(60.0, 0.013),
                band(70.0, 0.036),
                band(80.0, 0.080),
            ],
            oldest_rate:      0.148,
            comorbidity_rate: 0.105,
            scale:            1.0,
        }
    }
}

impl MortalityTable {
    fn validate(&self) -> EpiResult<()> {
        for (i, b) in self.bands.iter().enumerate() {
            check_unit(&format!("disease.mortality.bands[{i}].rate"), b.rate)?;
            if i > 0 && b.below_age <= self.bands[i - 1].below_age {
                return Err(config_err("disease.mortality.bands must be in ascending age order"));
            }
        }
        check_unit("disease.mortality.oldest_rate", self.oldest_rate)?;
        check_unit("disease.mortality.comorbidity_rate", self.comorbidity_rate)?;
        check_non_negative("disease.mortality.scale", self.scale)?;
        let worst = self
            .bands
            .iter()
            .map(|b| b.rate)
            .fold(self.oldest_rate.max(self.comorbidity_rate), f64::max);
        if self.scale * worst > 1.0 {
            return Err(config_err(format!(
                "disease.mortality.scale {} lifts the highest rate {worst} above 1",
                self.scale
            )));
        }
        Ok(())
    }
}

// ── EnvironmentConfig ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnvironmentConfig {
    /// Multiplier applied to every cell each tick, in `(0, 1]`.
    pub decay_factor: f64,
    /// Contamination an Infectious agent with `cleaning_propensity = 0`
    /// leaves at its own cell each tick.
    pub deposit_amount: f64,
    /// Taxicab radius, in cells, over which deposits and cleaning spread.
    pub deposit_radius_cells: u32,
    /// Attenuation per two cells of taxicab distance within the radius.
    pub deposit_falloff: f64,
    /// Saturation level of a single cell.
    pub max_intensity: f64,
    /// Contamination removed at the agent's cell by `cleaning_propensity = 1`.
    pub cleaning_efficacy: f64,
    /// Cells that decay below this level are dropped from the field.
    pub negligible_threshold: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            decay_factor:         0.4,
            deposit_amount:       1.0,
            deposit_radius_cells: 5,
            deposit_falloff:      0.4,
            max_intensity:        1.0,
            cleaning_efficacy:    1.0,
            negligible_threshold: 1e-4,
        }
    }
}

impl EnvironmentConfig {
    fn validate(&self, region: &RegionConfig) -> EpiResult<()> {
        if !(self.decay_factor > 0.0 && self.decay_factor <= 1.0) {
            return Err(config_err(format!(
                "environment.decay_factor {} outside (0, 1]",
                self.decay_factor
            )));
        }
        check_non_negative("environment.deposit_amount", self.deposit_amount)?;
        check_unit("environment.deposit_falloff", self.deposit_falloff)?;
        check_positive("environment.max_intensity", self.max_intensity)?;
        check_non_negative("environment.cleaning_efficacy", self.cleaning_efficacy)?;
        check_non_negative("environment.negligible_threshold", self.negligible_threshold)?;
        // Any radius past cols + rows already covers the whole grid.
        let (cols, rows) = region.grid_dims();
        if self.deposit_radius_cells > cols.saturating_add(rows) {
            return Err(config_err(format!(
                "environment.deposit_radius_cells {} exceeds the {cols}x{rows} grid",
                self.deposit_radius_cells
            )));
        }
        Ok(())
    }
}

// ── Validation helpers ────────────────────────────────────────────────────────

fn config_err(msg: impl Into<String>) -> EpiError {
    EpiError::Config(msg.into())
}

fn check_unit(name: &str, v: f64) -> EpiResult<()> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(config_err(format!("{name} = {v} is outside [0, 1]")))
    }
}

fn check_positive(name: &str, v: f64) -> EpiResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(config_err(format!("{name} = {v} must be a positive number")))
    }
}

fn check_non_negative(name: &str, v: f64) -> EpiResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(config_err(format!("{name} = {v} must be a non-negative number")))
    }
}
