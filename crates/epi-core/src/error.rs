//! Simulator error type.
//!
//! Sub-crates may define their own error enums and convert them into `EpiError`
//! via `From` impls, or keep them separate and wrap `EpiError` as one variant.
//! Both patterns are acceptable; prefer whichever keeps error sites clean.
//!
//! None of these errors is recoverable.  A `Config` error is raised before the first
//! tick; an `Invariant` error means the model state is corrupt and the run
//! must be abandoned.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `epi-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum EpiError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invariant violation: {0}")]
    Invariant(String),

    #[error("agent {0} not found")]
    AgentNotFound(AgentId),
}

/// Shorthand result type for all `epi-*` crates.
pub type EpiResult<T> = Result<T, EpiError>;
