//! The environment: a bounded region with a sparse contamination field.
//!
//! # Data layout
//!
//! The region is divided into square cells of edge `cell_size`.  Only cells
//! with a non-negligible intensity are stored, in an `FxHashMap<Cell, f64>`;
//! an absent cell reads as 0.  Decay drops cells that fall below the
//! negligible threshold, so memory tracks the contaminated area rather than
//! the region size.
//!
//! # Spread
//!
//! [`deposit_area`](Environment::deposit_area) and
//! [`clean_area`](Environment::clean_area) act on the diamond of cells within
//! taxicab distance `radius` of the target cell, scaling the amount by
//! `falloff^(d / 2)` at distance `d`.  Radius 0 touches the target cell only.
//!
//! Every operation is deterministic.  None of them draw random numbers.

use rustc_hash::FxHashMap;

use epi_core::{Bounds, EnvironmentConfig, RegionConfig, Vec2};

use crate::{SpatialError, SpatialResult};

/// Integer grid coordinates of a contamination cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn taxicab(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Bounded 2-D region with a decaying contamination field.
pub struct Environment {
    bounds:        Bounds,
    cell_size:     f64,
    cols:          i32,
    rows:          i32,
    max_intensity: f64,
    negligible:    f64,
    field:         FxHashMap<Cell, f64>,
}

impl Environment {
    /// An empty field over `bounds`.  Intensity is unbounded above and any
    /// positive value is kept until it decays to exactly 0.
    pub fn new(bounds: Bounds, cell_size: f64) -> SpatialResult<Self> {
        positive("region width", bounds.width)?;
        positive("region height", bounds.height)?;
        positive("cell size", cell_size)?;
        let cols = (bounds.width / cell_size).ceil().max(1.0) as i32;
        let rows = (bounds.height / cell_size).ceil().max(1.0) as i32;
        Ok(Self {
            bounds,
            cell_size,
            cols,
            rows,
            max_intensity: f64::INFINITY,
            negligible: 0.0,
            field: FxHashMap::default(),
        })
    }

    /// Build from the region and environment sections of the run config.
    pub fn from_config(region: &RegionConfig, env: &EnvironmentConfig) -> SpatialResult<Self> {
        Self::new(region.bounds(), region.cell_size)?
            .with_saturation(env.max_intensity)?
            .with_negligible_threshold(env.negligible_threshold)
    }

    /// Cap every cell at `max`.
    pub fn with_saturation(mut self, max: f64) -> SpatialResult<Self> {
        if max.is_nan() || max <= 0.0 {
            return Err(SpatialError::InvalidArgument { what: "saturation level", value: max });
        }
        self.max_intensity = max;
        Ok(self)
    }

    /// Drop cells whose intensity falls below `threshold`.
    pub fn with_negligible_threshold(mut self, threshold: f64) -> SpatialResult<Self> {
        non_negative("negligible threshold", threshold)?;
        self.negligible = threshold;
        Ok(self)
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// The cell containing `p`, after clamping `p` to the region.
    pub fn cell_of(&self, p: Vec2) -> Cell {
        let p = self.bounds.clamp(p);
        let x = ((p.x / self.cell_size).floor() as i32).clamp(0, self.cols - 1);
        let y = ((p.y / self.cell_size).floor() as i32).clamp(0, self.rows - 1);
        Cell::new(x, y)
    }

    /// Centre of `cell` in region coordinates.
    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        Vec2::new(
            (cell.x as f64 + 0.5) * self.cell_size,
            (cell.y as f64 + 0.5) * self.cell_size,
        )
    }

    #[inline]
    pub fn in_grid(&self, cell: Cell) -> bool {
        (0..self.cols).contains(&cell.x) && (0..self.rows).contains(&cell.y)
    }

    // ── Contract ──────────────────────────────────────────────────────────

    /// Add `amount` at the cell containing `location`.
    pub fn deposit(&mut self, location: Vec2, amount: f64) -> SpatialResult<()> {
        self.deposit_area(location, amount, 0, 1.0)
    }

    /// Current contamination at the cell containing `location`.
    #[inline]
    pub fn sample(&self, location: Vec2) -> f64 {
        self.sample_cell(self.cell_of(location))
    }

    #[inline]
    pub fn sample_cell(&self, cell: Cell) -> f64 {
        self.field.get(&cell).copied().unwrap_or(0.0)
    }

    /// Multiply every cell by `factor ∈ (0, 1]` and drop negligible cells.
    pub fn decay(&mut self, factor: f64) -> SpatialResult<()> {
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(SpatialError::InvalidArgument { what: "decay factor", value: factor });
        }
        let negligible = self.negligible;
        self.field.retain(|_, v| {
            *v *= factor;
            *v > 0.0 && *v >= negligible
        });
        Ok(())
    }

    /// Subtract `reduction` at the cell containing `location`, floored at 0.
    pub fn clean(&mut self, location: Vec2, reduction: f64) -> SpatialResult<()> {
        self.clean_area(location, reduction, 0, 1.0)
    }

    // ── Area variants ─────────────────────────────────────────────────────

    /// Add `amount · falloff^(d/2)` to every cell within taxicab distance
    /// `radius` of the cell containing `location`.
    pub fn deposit_area(
        &mut self,
        location: Vec2,
        amount:   f64,
        radius:   u32,
        falloff:  f64,
    ) -> SpatialResult<()> {
        non_negative("deposit amount", amount)?;
        non_negative("falloff", falloff)?;
        if amount == 0.0 {
            return Ok(());
        }
        let center = self.cell_of(location);
        let max = self.max_intensity;
        for (cell, weight) in self.diamond(center, radius, falloff) {
            let add = amount * weight;
            if add > 0.0 {
                let v = self.field.entry(cell).or_insert(0.0);
                *v = (*v + add).min(max);
            }
        }
        Ok(())
    }

    /// Subtract `reduction · falloff^(d/2)` from every cell within taxicab
    /// distance `radius`, flooring at 0.
    pub fn clean_area(
        &mut self,
        location:  Vec2,
        reduction: f64,
        radius:    u32,
        falloff:   f64,
    ) -> SpatialResult<()> {
        non_negative("cleaning reduction", reduction)?;
        non_negative("falloff", falloff)?;
        if reduction == 0.0 || self.field.is_empty() {
            return Ok(());
        }
        let center = self.cell_of(location);
        let negligible = self.negligible;
        for (cell, weight) in self.diamond(center, radius, falloff) {
            if let Some(v) = self.field.get_mut(&cell) {
                *v = (*v - reduction * weight).max(0.0);
                if *v <= 0.0 || *v < negligible {
                    self.field.remove(&cell);
                }
            }
        }
        Ok(())
    }

    /// In-grid cells of the taxicab diamond around `center` with their
    /// falloff weights, in row-major order.
    fn diamond(&self, center: Cell, radius: u32, falloff: f64) -> Vec<(Cell, f64)> {
        // No in-grid cell lies further than cols + rows from any other.
        let reach = (self.cols + self.rows) as u32;
        let r = radius.min(reach) as i32;
        let mut cells = Vec::new();
        for x in (center.x - r).max(0)..=(center.x + r).min(self.cols - 1) {
            let left = r - (x - center.x).abs();
            for y in (center.y - left).max(0)..=(center.y + left).min(self.rows - 1) {
                let cell = Cell::new(x, y);
                let d = center.taxicab(cell);
                let weight = if d == 0 { 1.0 } else { falloff.powf(d as f64 / 2.0) };
                cells.push((cell, weight));
            }
        }
        cells
    }

    // ── Summaries ─────────────────────────────────────────────────────────

    /// Sum of all cell intensities.
    pub fn total_contamination(&self) -> f64 {
        self.field.values().sum()
    }

    /// Number of stored (non-negligible) cells.
    #[inline]
    pub fn contaminated_cells(&self) -> usize {
        self.field.len()
    }

    /// All stored cells, sorted by coordinates.
    pub fn cells(&self) -> Vec<(Cell, f64)> {
        let mut cells: Vec<(Cell, f64)> = self.field.iter().map(|(&c, &v)| (c, v)).collect();
        cells.sort_unstable_by_key(|&(c, _)| c);
        cells
    }

    /// Fail on any negative or non-finite cell.
    pub fn check_invariants(&self) -> SpatialResult<()> {
        match self.field.iter().find(|(_, v)| !v.is_finite() || **v < 0.0) {
            Some((&cell, &value)) => Err(SpatialError::BadIntensity { cell, value }),
            None => Ok(()),
        }
    }
}

fn positive(what: &'static str, value: f64) -> SpatialResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SpatialError::InvalidArgument { what, value })
    }
}

fn non_negative(what: &'static str, value: f64) -> SpatialResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SpatialError::InvalidArgument { what, value })
    }
}
