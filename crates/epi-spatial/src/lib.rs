//! `epi-spatial` — the contamination field and neighbour queries.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`environment`] | `Environment` (sparse contamination grid), `Cell`         |
//! | [`index`]       | `NeighborIndex` trait, `GridIndex`, `RTreeIndex`          |
//! | [`error`]       | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Cell`.                 |

pub mod environment;
pub mod error;
pub mod index;


pub use environment::{Cell, Environment};
pub use error::{SpatialError, SpatialResult};
pub use index::{GridIndex, NeighborIndex, RTreeIndex, brute_force_within};
