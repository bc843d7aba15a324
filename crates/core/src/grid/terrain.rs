//! Row-major terrain grid
//!
//! Owns every [`TerrainCell`] of the simulation. Coordinates are `(x, y)` with
//! `x` the column and `y` the row; row 0 is the northern edge, so north is
//! towards decreasing `y`.

use serde::{Deserialize, Serialize};

use crate::core_types::units::{Degrees, Meters};
use crate::error::{Result, SimulationError};

use super::cell::{CellState, TerrainCell, VegetationType};

/// Offsets of the 8 Moore neighbours
pub(crate) const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// In-grid Moore neighbours of `(x, y)`, clipped at the boundary (never wrapped)
pub fn neighbors(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (usize, usize)> {
    NEIGHBOR_OFFSETS.iter().filter_map(move |&(dx, dy)| {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < width && ny < height).then_some((nx, ny))
    })
}

/// Fixed-size grid of terrain cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainGrid {
    width: usize,
    height: usize,
    cells: Vec<TerrainCell>,
}

impl TerrainGrid {
    /// Create a `width x height` grid of default cells
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![TerrainCell::default(); width * height],
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells (`width * height`)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `true` if `(x, y)` lies inside the grid
    #[inline]
    #[must_use]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Row-major index of `(x, y)`; caller guarantees bounds
    #[inline]
    #[must_use]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Cell at `(x, y)`, or `None` outside the grid
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<&TerrainCell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn cell_mut(&mut self, x: usize, y: usize) -> Option<&mut TerrainCell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// All cells in row-major order
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[TerrainCell] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [TerrainCell] {
        &mut self.cells
    }

    /// In-grid neighbours of `(x, y)`
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
        neighbors(x, y, self.width, self.height)
    }

    fn bounds_error(&self, x: usize, y: usize) -> SimulationError {
        SimulationError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Load elevation, fuel and vegetation for every cell
    ///
    /// All three slices are row-major and must hold exactly `width * height`
    /// values. Every cell is reset to full fuel; cells with `fuel_load <= 0`
    /// become `Empty`. Slope and aspect are derived once all elevations are in
    /// place.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::SizeMismatch`] if any slice has the wrong length
    /// - [`SimulationError::InvalidInput`] if an elevation or fuel load is not finite
    ///
    /// The grid is unchanged when an error is returned.
    pub fn initialize_from_data(
        &mut self,
        elevations: &[f64],
        fuel_loads: &[f64],
        vegetation_types: &[VegetationType],
        cell_size: Meters,
    ) -> Result<()> {
        let expected = self.len();
        if elevations.len() != expected
            || fuel_loads.len() != expected
            || vegetation_types.len() != expected
        {
            return Err(SimulationError::SizeMismatch {
                expected,
                elevations: elevations.len(),
                fuel_loads: fuel_loads.len(),
                vegetation_types: vegetation_types.len(),
            });
        }
        if let Some(i) = elevations.iter().position(|e| !e.is_finite()) {
            return Err(SimulationError::InvalidInput(format!(
                "elevation at index {i} is not finite"
            )));
        }
        if let Some(i) = fuel_loads.iter().position(|f| !f.is_finite()) {
            return Err(SimulationError::InvalidInput(format!(
                "fuel load at index {i} is not finite"
            )));
        }

        for (cell, ((&elevation, &fuel_load), &vegetation)) in self
            .cells
            .iter_mut()
            .zip(elevations.iter().zip(fuel_loads).zip(vegetation_types))
        {
            *cell = TerrainCell::new(elevation, fuel_load, vegetation);
        }

        self.compute_slope_and_aspect(cell_size);
        Ok(())
    }

    /// Derive per-cell slope and aspect from the current elevations
    ///
    /// Slope is `atan(max |Δelevation| / cell_size)` over the in-grid
    /// neighbours. Aspect is the compass bearing of steepest descent from a
    /// central-difference gradient (one-sided at the edges); flat cells face
    /// north.
    fn compute_slope_and_aspect(&mut self, cell_size: Meters) {
        let (width, height) = (self.width, self.height);
        let elevation: Vec<f64> = self.cells.iter().map(|c| c.elevation).collect();
        let at = |x: usize, y: usize| elevation[y * width + x];

        for y in 0..height {
            for x in 0..width {
                let here = at(x, y);
                let max_diff = neighbors(x, y, width, height)
                    .map(|(nx, ny)| (here - at(nx, ny)).abs())
                    .fold(0.0_f64, f64::max);
                let slope = (max_diff / *cell_size).atan().to_degrees();

                let (x0, x1) = (x.saturating_sub(1), (x + 1).min(width - 1));
                let (y0, y1) = (y.saturating_sub(1), (y + 1).min(height - 1));
                let dz_dx = if x1 > x0 {
                    (at(x1, y) - at(x0, y)) / ((x1 - x0) as f64 * *cell_size)
                } else {
                    0.0
                };
                // y grows southwards
                let dz_dy = if y1 > y0 {
                    (at(x, y1) - at(x, y0)) / ((y1 - y0) as f64 * *cell_size)
                } else {
                    0.0
                };
                let aspect = if dz_dx == 0.0 && dz_dy == 0.0 {
                    0.0
                } else {
                    (-dz_dx).atan2(dz_dy).to_degrees()
                };

                let cell = &mut self.cells[y * width + x];
                cell.slope = Degrees::new(slope);
                cell.aspect = Degrees::new(aspect).normalized();
            }
        }
    }

    /// Set the cell at `(x, y)` burning
    ///
    /// # Errors
    ///
    /// - [`SimulationError::OutOfBounds`] if `(x, y)` is outside the grid
    /// - [`SimulationError::NotIgnitable`] if the cell is empty, already
    ///   burning, burnt, or has no more than `burnout_threshold` fuel left
    pub fn ignite(&mut self, x: usize, y: usize, burnout_threshold: f64) -> Result<()> {
        self.check_bounds(x, y)?;
        let idx = self.index(x, y);
        let cell = &mut self.cells[idx];
        if !cell.is_ignitable(burnout_threshold) {
            return Err(SimulationError::NotIgnitable {
                x,
                y,
                state: cell.state,
            });
        }
        cell.state = CellState::Burning;
        Ok(())
    }

    /// Check that `(x, y)` is inside the grid
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::OutOfBounds`] otherwise.
    pub fn check_bounds(&self, x: usize, y: usize) -> Result<()> {
        if self.in_bounds(x, y) {
            Ok(())
        } else {
            Err(self.bounds_error(x, y))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform(width: usize, height: usize, fuel: f64) -> TerrainGrid {
        let n = width * height;
        let mut grid = TerrainGrid::new(width, height);
        grid.initialize_from_data(
            &vec![0.0; n],
            &vec![fuel; n],
            &vec![VegetationType::Moderate; n],
            Meters::new(30.0),
        )
        .unwrap();
        grid
    }

    #[test]
    fn test_neighbors_clipped_at_corners_and_edges() {
        let grid = TerrainGrid::new(4, 3);
        let corner: Vec<_> = grid.neighbors(0, 0).collect();
        assert_eq!(corner.len(), 3);
        assert!(corner.contains(&(1, 0)));
        assert!(corner.contains(&(0, 1)));
        assert!(corner.contains(&(1, 1)));

        assert_eq!(grid.neighbors(3, 2).count(), 3);
        assert_eq!(grid.neighbors(1, 0).count(), 5);
        assert_eq!(grid.neighbors(1, 1).count(), 8);

        for y in 0..3 {
            for x in 0..4 {
                for (nx, ny) in grid.neighbors(x, y) {
                    assert!(nx < 4 && ny < 3);
                    assert_ne!((nx, ny), (x, y));
                }
            }
        }
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbors() {
        let grid = TerrainGrid::new(1, 1);
        assert_eq!(grid.neighbors(0, 0).count(), 0);
    }

    #[test]
    fn test_size_mismatch_leaves_grid_untouched() {
        let mut grid = uniform(3, 3, 10.0);
        grid.ignite(1, 1, 0.01).unwrap();
        let before = grid.clone();

        let err = grid
            .initialize_from_data(
                &[0.0; 9],
                &[5.0; 8],
                &[VegetationType::Dense; 9],
                Meters::new(30.0),
            )
            .unwrap_err();
        assert_eq!(
            err,
            SimulationError::SizeMismatch {
                expected: 9,
                elevations: 9,
                fuel_loads: 8,
                vegetation_types: 9,
            }
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn test_zero_fuel_cells_are_empty() {
        let mut grid = TerrainGrid::new(2, 1);
        grid.initialize_from_data(
            &[0.0, 0.0],
            &[0.0, 7.0],
            &[VegetationType::Sparse, VegetationType::Sparse],
            Meters::new(30.0),
        )
        .unwrap();
        assert_eq!(grid.cell(0, 0).unwrap().state(), CellState::Empty);
        assert_eq!(grid.cell(1, 0).unwrap().state(), CellState::Vegetation);
    }

    #[test]
    fn test_slope_uses_all_final_elevations() {
        // Only the last cell is raised; the first cell must still see it as a
        // neighbour even though it is assigned later.
        let mut grid = TerrainGrid::new(2, 2);
        grid.initialize_from_data(
            &[0.0, 0.0, 0.0, 30.0],
            &[10.0; 4],
            &[VegetationType::Moderate; 4],
            Meters::new(30.0),
        )
        .unwrap();
        for cell in grid.cells() {
            assert_relative_eq!(*cell.slope(), 45.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_aspect_faces_downhill() {
        // Elevation rises eastwards, so slopes face west
        let mut grid = TerrainGrid::new(3, 3);
        let elevations: Vec<f64> = (0..9_u32).map(|i| f64::from(i % 3) * 10.0).collect();
        grid.initialize_from_data(
            &elevations,
            &[10.0; 9],
            &[VegetationType::Moderate; 9],
            Meters::new(30.0),
        )
        .unwrap();
        assert_relative_eq!(*grid.cell(1, 1).unwrap().aspect(), 270.0, epsilon = 1e-9);

        // Elevation rises southwards, so slopes face north
        let elevations: Vec<f64> = (0..9_u32).map(|i| f64::from(i / 3) * 10.0).collect();
        grid.initialize_from_data(
            &elevations,
            &[10.0; 9],
            &[VegetationType::Moderate; 9],
            Meters::new(30.0),
        )
        .unwrap();
        assert_relative_eq!(*grid.cell(1, 1).unwrap().aspect(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ignite_errors() {
        let mut grid = TerrainGrid::new(3, 3);
        grid.initialize_from_data(
            &[0.0; 9],
            &[10.0, 0.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0],
            &[VegetationType::Moderate; 9],
            Meters::new(30.0),
        )
        .unwrap();

        assert!(matches!(
            grid.ignite(3, 0, 0.01),
            Err(SimulationError::OutOfBounds { x: 3, y: 0, .. })
        ));
        assert!(matches!(
            grid.ignite(1, 0, 0.01),
            Err(SimulationError::NotIgnitable {
                state: CellState::Empty,
                ..
            })
        ));

        grid.ignite(0, 0, 0.01).unwrap();
        assert!(grid.cell(0, 0).unwrap().is_ignited());
        assert!(matches!(
            grid.ignite(0, 0, 0.01),
            Err(SimulationError::NotIgnitable {
                state: CellState::Burning,
                ..
            })
        ));

        grid.cell_mut(2, 2).unwrap().fuel_remaining = 0.01;
        assert!(matches!(
            grid.ignite(2, 2, 0.01),
            Err(SimulationError::NotIgnitable {
                state: CellState::Vegetation,
                ..
            })
        ));
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let mut grid = uniform(2, 1, 10.0);
        let before = grid.clone();
        assert!(matches!(
            grid.initialize_from_data(
                &[0.0, f64::NAN],
                &[10.0, 10.0],
                &[VegetationType::Moderate; 2],
                Meters::new(30.0),
            ),
            Err(SimulationError::InvalidInput(_))
        ));
        assert_eq!(grid, before);
    }
}
