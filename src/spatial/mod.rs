//! Spatial data structures
//!
//! This module contains spatial-related functionality including:
//! - The tile grid and the host contract the synthesizer drives
//! - Per-cell search nodes and the frontier cost model

/// Tile grid storage, host contract and enclosure checks
pub mod grid;
/// Search nodes, neighbor offsets and cost recomputation
pub mod node;

pub use grid::TileGrid;
