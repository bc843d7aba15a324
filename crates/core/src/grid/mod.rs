//! Terrain grid and per-cell state
//!
//! - [`cell`]: vegetation classes, fire states and the [`TerrainCell`] record
//! - [`terrain`]: the row-major [`TerrainGrid`], initialisation and ignition

pub mod cell;
pub mod terrain;

pub use cell::{CellState, TerrainCell, VegetationType};
pub use terrain::{neighbors, TerrainGrid};
