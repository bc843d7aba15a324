//! Per-cell state of the terrain grid

use serde::{Deserialize, Serialize};

use crate::core_types::units::Degrees;
use crate::error::SimulationError;

/// Vegetation class of a cell
///
/// Dispatch is by lookup table indexed with the `u8` discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum VegetationType {
    Sparse = 0,
    #[default]
    Moderate = 1,
    Dense = 2,
    Extreme = 3,
}

/// Spread multiplier per vegetation class
const FUEL_MULTIPLIER: [f64; 4] = [0.5, 1.0, 2.0, 4.0];

/// Risk weight per vegetation class
const RISK_WEIGHT: [f64; 4] = [0.3, 0.6, 0.9, 1.0];

impl VegetationType {
    /// All classes, sparsest first
    pub const ALL: [VegetationType; 4] = [
        VegetationType::Sparse,
        VegetationType::Moderate,
        VegetationType::Dense,
        VegetationType::Extreme,
    ];

    /// Spread rate multiplier: Sparse 0.5, Moderate 1.0, Dense 2.0, Extreme 4.0
    #[inline]
    #[must_use]
    pub fn fuel_multiplier(self) -> f64 {
        FUEL_MULTIPLIER[self as usize]
    }

    /// Weight in the risk surface: Sparse 0.3, Moderate 0.6, Dense 0.9, Extreme 1.0
    #[inline]
    #[must_use]
    pub fn risk_weight(self) -> f64 {
        RISK_WEIGHT[self as usize]
    }

    /// The next denser class (Extreme stays Extreme)
    #[must_use]
    pub fn denser(self) -> Self {
        match self {
            VegetationType::Sparse => VegetationType::Moderate,
            VegetationType::Moderate => VegetationType::Dense,
            VegetationType::Dense | VegetationType::Extreme => VegetationType::Extreme,
        }
    }
}

impl TryFrom<u8> for VegetationType {
    type Error = SimulationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        VegetationType::ALL
            .get(usize::from(code))
            .copied()
            .ok_or_else(|| SimulationError::InvalidInput(format!("unknown vegetation code {code}")))
    }
}

/// Fire state of a cell
///
/// `Empty` never changes and `Burnt` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellState {
    Empty = 0,
    Vegetation = 1,
    Burning = 2,
    Burnt = 3,
}

impl CellState {
    /// All states in code order
    pub const ALL: [CellState; 4] = [
        CellState::Empty,
        CellState::Vegetation,
        CellState::Burning,
        CellState::Burnt,
    ];

    /// Raw `u8` code
    #[inline]
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for CellState {
    type Error = SimulationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        CellState::ALL
            .get(usize::from(code))
            .copied()
            .ok_or_else(|| SimulationError::InvalidInput(format!("unknown cell state code {code}")))
    }
}

/// One cell of the terrain grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainCell {
    pub(crate) elevation: f64,
    pub(crate) slope: Degrees,
    pub(crate) aspect: Degrees,
    pub(crate) vegetation_type: VegetationType,
    pub(crate) fuel_load: f64,
    pub(crate) state: CellState,
    pub(crate) burn_intensity: f64,
    pub(crate) fuel_remaining: f64,
}

impl Default for TerrainCell {
    /// Flat moderate vegetation carrying 10 t/ha
    fn default() -> Self {
        Self::new(0.0, 10.0, VegetationType::Moderate)
    }
}

impl TerrainCell {
    /// Fresh cell with full fuel; `fuel_load <= 0` makes it `Empty`
    #[must_use]
    pub fn new(elevation: f64, fuel_load: f64, vegetation_type: VegetationType) -> Self {
        let state = if fuel_load > 0.0 {
            CellState::Vegetation
        } else {
            CellState::Empty
        };
        Self {
            elevation,
            slope: Degrees::new(0.0),
            aspect: Degrees::new(0.0),
            vegetation_type,
            fuel_load,
            state,
            burn_intensity: 0.0,
            fuel_remaining: 1.0,
        }
    }

    /// Elevation (m)
    #[must_use]
    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    /// Steepest slope to any neighbour
    #[must_use]
    pub fn slope(&self) -> Degrees {
        self.slope
    }

    /// Downhill compass bearing (0 = north, clockwise)
    #[must_use]
    pub fn aspect(&self) -> Degrees {
        self.aspect
    }

    #[must_use]
    pub fn vegetation_type(&self) -> VegetationType {
        self.vegetation_type
    }

    /// Fuel load (t/ha)
    #[must_use]
    pub fn fuel_load(&self) -> f64 {
        self.fuel_load
    }

    #[must_use]
    pub fn state(&self) -> CellState {
        self.state
    }

    #[must_use]
    pub fn burn_intensity(&self) -> f64 {
        self.burn_intensity
    }

    /// Fraction of the original fuel still present (0-1)
    #[must_use]
    pub fn fuel_remaining(&self) -> f64 {
        self.fuel_remaining
    }

    /// `true` while the cell is actively burning
    #[inline]
    #[must_use]
    pub fn is_ignited(&self) -> bool {
        self.state == CellState::Burning
    }

    /// Whether the cell can catch fire given the burn-out threshold
    #[inline]
    #[must_use]
    pub fn is_ignitable(&self, burnout_threshold: f64) -> bool {
        self.state == CellState::Vegetation && self.fuel_remaining > burnout_threshold
    }

    /// Burned means more than `1 - burned_threshold` of the fuel is gone
    #[inline]
    #[must_use]
    pub fn is_burned(&self, burned_threshold: f64) -> bool {
        self.fuel_remaining < burned_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vegetation_lookup_tables() {
        assert_eq!(VegetationType::Sparse.fuel_multiplier(), 0.5);
        assert_eq!(VegetationType::Extreme.fuel_multiplier(), 4.0);
        assert_eq!(VegetationType::Moderate.risk_weight(), 0.6);
        assert_eq!(VegetationType::Dense.risk_weight(), 0.9);
        assert_eq!(VegetationType::Dense.denser(), VegetationType::Extreme);
        assert_eq!(VegetationType::Extreme.denser(), VegetationType::Extreme);
    }

    #[test]
    fn test_codes_round_trip_and_reject_unknown() {
        assert_eq!(VegetationType::try_from(2), Ok(VegetationType::Dense));
        assert!(VegetationType::try_from(4).is_err());
        assert_eq!(CellState::try_from(3), Ok(CellState::Burnt));
        assert!(CellState::try_from(9).is_err());
        assert_eq!(CellState::Burning.code(), 2);
    }

    #[test]
    fn test_new_cell_state_follows_fuel() {
        let cell = TerrainCell::new(100.0, 12.0, VegetationType::Dense);
        assert_eq!(cell.state(), CellState::Vegetation);
        assert_eq!(cell.fuel_remaining(), 1.0);
        assert!(cell.is_ignitable(0.01));
        assert!(!cell.is_ignited());

        let bare = TerrainCell::new(100.0, 0.0, VegetationType::Dense);
        assert_eq!(bare.state(), CellState::Empty);
        assert!(!bare.is_ignitable(0.01));
    }

    #[test]
    fn test_default_cell_is_burnable() {
        let cell = TerrainCell::default();
        assert_eq!(cell.state(), CellState::Vegetation);
        assert_eq!(cell.fuel_load(), 10.0);
        assert_eq!(cell.vegetation_type(), VegetationType::Moderate);
    }

    #[test]
    fn test_depleted_cell_is_not_ignitable() {
        let mut cell = TerrainCell::new(0.0, 10.0, VegetationType::Moderate);
        cell.fuel_remaining = 0.005;
        assert!(!cell.is_ignitable(0.01));
        assert!(cell.is_burned(0.9));
    }
}
