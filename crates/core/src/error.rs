//! Error taxonomy for the bushfire simulation core.
//!
//! Every fallible operation validates its inputs before touching simulation
//! state, so an `Err` always leaves the grid exactly as it was.

use std::fmt;

use crate::grid::CellState;

/// Errors surfaced by the simulation core.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Weather values outside the accepted ranges (or non-finite).
    InvalidWeather {
        /// Which field failed and why
        reason: String,
    },
    /// Terrain arrays do not match `width * height`.
    SizeMismatch {
        expected: usize,
        elevations: usize,
        fuel_loads: usize,
        vegetation_types: usize,
    },
    /// Coordinates outside the grid.
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// The cell exists but cannot be ignited (empty, burning, burnt or depleted).
    NotIgnitable { x: usize, y: usize, state: CellState },
    /// Any other rejected argument (timestep, empty inputs, bad configuration).
    InvalidInput(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWeather { reason } => write!(f, "invalid weather: {reason}"),
            Self::SizeMismatch {
                expected,
                elevations,
                fuel_loads,
                vegetation_types,
            } => write!(
                f,
                "terrain size mismatch: expected {expected} cells, got elevations={elevations}, \
                 fuel_loads={fuel_loads}, vegetation_types={vegetation_types}"
            ),
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "invalid coordinates ({x}, {y}) for {width}x{height} grid"
            ),
            Self::NotIgnitable { x, y, state } => {
                write!(f, "cell ({x}, {y}) cannot ignite in state {state:?}")
            }
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for SimulationError {}

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;
