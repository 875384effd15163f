//! Greedy best-first wall synthesis around building clusters on tile grids
//!
//! Grows an interior region outward from the center of the buildings, one
//! expansion per step, and treats the frontier of that region as the wall
//! under construction. The search stops once the frontier encloses every
//! building as a simple chain of segments, optionally continuing for a few
//! steps in case a shorter wall turns up.

#![forbid(unsafe_code)]

/// Frontier management, the wall criteria and the step-driven synthesizer
pub mod algorithm;
/// Input/output operations, configuration and error handling
pub mod io;
/// Tile grid, host contract and per-cell search records
pub mod spatial;

pub use algorithm::synthesizer::{FailureReason, RunStatus, WallConfig, WallSynthesizer};
pub use io::error::{Result, WallError};
pub use spatial::grid::{CellType, Highlight, TileGrid, TileHost};
