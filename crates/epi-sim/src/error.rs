use thiserror::Error;

use epi_core::{EpiError, Tick};
use epi_spatial::SpatialError;

/// Errors that abort a run.  None are retried.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Epi(#[from] EpiError),

    #[error("environment error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("simulation already stopped at {0}")]
    Stopped(Tick),
}

pub type SimResult<T> = Result<T, SimError>;
