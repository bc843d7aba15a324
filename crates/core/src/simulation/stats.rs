//! Read-only metrics and flat extraction over a committed grid

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::core_types::units::Hectares;
use crate::grid::{CellState, TerrainGrid};

/// Burned area: cells below `burned_threshold` fuel, scaled to hectares
#[must_use]
pub fn total_burned_area(grid: &TerrainGrid, config: &SimulationConfig) -> Hectares {
    config.cell_size.square_hectares() * burned_cell_count(grid, config) as f64
}

/// Number of cells whose remaining fuel is below `burned_threshold`
#[must_use]
pub fn burned_cell_count(grid: &TerrainGrid, config: &SimulationConfig) -> usize {
    grid.cells()
        .iter()
        .filter(|c| c.is_burned(config.burned_threshold))
        .count()
}

/// Highest burn intensity on the grid (0 when nothing has burned)
#[must_use]
pub fn maximum_intensity(grid: &TerrainGrid) -> f64 {
    grid.cells()
        .iter()
        .map(|c| c.burn_intensity())
        .fold(0.0, f64::max)
}

/// `(active fires, perimeter cells)`
///
/// A perimeter cell is a burning cell with at least one in-grid neighbour
/// that is not burning.
#[must_use]
pub fn fire_perimeter_count(grid: &TerrainGrid) -> (usize, usize) {
    let cells = grid.cells();
    let mut active = 0;
    let mut perimeter = 0;

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if !cells[grid.index(x, y)].is_ignited() {
                continue;
            }
            active += 1;
            if grid
                .neighbors(x, y)
                .any(|(nx, ny)| !cells[grid.index(nx, ny)].is_ignited())
            {
                perimeter += 1;
            }
        }
    }
    (active, perimeter)
}

/// Number of cells in each [`CellState`], indexed by state code
#[must_use]
pub fn state_counts(grid: &TerrainGrid) -> [usize; 4] {
    let mut counts = [0; 4];
    for cell in grid.cells() {
        counts[cell.state() as usize] += 1;
    }
    counts
}

/// Row-major burn intensity
#[must_use]
pub fn burn_intensity_grid(grid: &TerrainGrid) -> Vec<f64> {
    grid.cells().iter().map(|c| c.burn_intensity()).collect()
}

/// Row-major burned mask (remaining fuel below `burned_threshold`)
#[must_use]
pub fn burned_areas(grid: &TerrainGrid, config: &SimulationConfig) -> Vec<bool> {
    grid.cells()
        .iter()
        .map(|c| c.is_burned(config.burned_threshold))
        .collect()
}

/// Row-major remaining fuel fraction
#[must_use]
pub fn fuel_remaining_grid(grid: &TerrainGrid) -> Vec<f64> {
    grid.cells().iter().map(|c| c.fuel_remaining()).collect()
}

/// Row-major [`CellState`] codes
#[must_use]
pub fn cell_states(grid: &TerrainGrid) -> Vec<u8> {
    grid.cells().iter().map(|c| c.state().code()).collect()
}

/// Snapshot of the simulation after a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStatistics {
    /// Steps completed
    pub step: u64,
    pub empty_cells: usize,
    pub vegetation_cells: usize,
    pub burning_cells: usize,
    pub burnt_cells: usize,
    /// Cells with remaining fuel below the burned threshold
    pub burned_cells: usize,
    /// `burned_cells / total cells` (0 for an empty grid)
    pub burned_fraction: f64,
    pub burned_area: Hectares,
    pub max_intensity: f64,
    pub active_fires: usize,
    pub perimeter_cells: usize,
}

impl SimulationStatistics {
    /// Collect every metric from `grid`
    #[must_use]
    pub fn collect(grid: &TerrainGrid, config: &SimulationConfig, step: u64) -> Self {
        let counts = state_counts(grid);
        let burned_cells = burned_cell_count(grid, config);
        let (active_fires, perimeter_cells) = fire_perimeter_count(grid);
        let burned_fraction = if grid.is_empty() {
            0.0
        } else {
            burned_cells as f64 / grid.len() as f64
        };

        Self {
            step,
            empty_cells: counts[CellState::Empty as usize],
            vegetation_cells: counts[CellState::Vegetation as usize],
            burning_cells: counts[CellState::Burning as usize],
            burnt_cells: counts[CellState::Burnt as usize],
            burned_cells,
            burned_fraction,
            burned_area: config.cell_size.square_hectares() * burned_cells as f64,
            max_intensity: maximum_intensity(grid),
            active_fires,
            perimeter_cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::Meters;
    use crate::grid::VegetationType;
    use approx::assert_relative_eq;

    fn grid_with_fire() -> TerrainGrid {
        let mut grid = TerrainGrid::new(4, 4);
        grid.initialize_from_data(
            &[0.0; 16],
            &[10.0; 16],
            &[VegetationType::Moderate; 16],
            Meters::new(30.0),
        )
        .unwrap();
        // 2x2 burning block in the top-left corner
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            grid.ignite(x, y, 0.01).unwrap();
        }
        grid
    }

    #[test]
    fn test_unburnt_grid_metrics() {
        let config = SimulationConfig::default();
        let grid = TerrainGrid::new(5, 5);
        assert_eq!(*total_burned_area(&grid, &config), 0.0);
        assert_eq!(maximum_intensity(&grid), 0.0);
        assert_eq!(fire_perimeter_count(&grid), (0, 0));
        assert!(burned_areas(&grid, &config).iter().all(|b| !b));
    }

    #[test]
    fn test_perimeter_counts_cells_touching_unburnt() {
        let grid = grid_with_fire();
        // (0,0) only touches burning cells; the other three touch vegetation
        assert_eq!(fire_perimeter_count(&grid), (4, 3));
    }

    #[test]
    fn test_burned_area_in_hectares() {
        let config = SimulationConfig::default();
        let mut grid = grid_with_fire();
        for idx in [0, 1, 5] {
            grid.cells_mut()[idx].fuel_remaining = 0.5;
        }
        // 3 cells of 900 m² each
        assert_relative_eq!(*total_burned_area(&grid, &config), 0.27, epsilon = 1e-12);
        let mask = burned_areas(&grid, &config);
        assert_eq!(mask.iter().filter(|b| **b).count(), 3);
        assert!(mask[5]);
    }

    #[test]
    fn test_statistics_snapshot() {
        let config = SimulationConfig::default();
        let mut grid = grid_with_fire();
        grid.cells_mut()[15].state = CellState::Burnt;
        grid.cells_mut()[15].fuel_remaining = 0.0;
        grid.cells_mut()[0].burn_intensity = 0.4;

        let stats = SimulationStatistics::collect(&grid, &config, 7);
        assert_eq!(stats.step, 7);
        assert_eq!(stats.burning_cells, 4);
        assert_eq!(stats.burnt_cells, 1);
        assert_eq!(stats.vegetation_cells, 11);
        assert_eq!(stats.empty_cells, 0);
        assert_eq!(stats.burned_cells, 1);
        assert_relative_eq!(stats.burned_fraction, 1.0 / 16.0);
        assert_eq!(stats.max_intensity, 0.4);
        assert_eq!(cell_states(&grid)[15], 3);
    }
}
