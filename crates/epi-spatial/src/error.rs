//! Spatial-subsystem error type.

use thiserror::Error;

use crate::Cell;

/// Errors produced by `epi-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("invalid {what}: {value}")]
    InvalidArgument { what: &'static str, value: f64 },

    #[error("contamination at cell {cell:?} is {value}, expected a finite value >= 0")]
    BadIntensity { cell: Cell, value: f64 },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
