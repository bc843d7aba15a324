//! Bushfire spread simulation
//!
//! [`BushfireSimulation`] owns the terrain grid, a scratch buffer of the same
//! size, the immutable [`SimulationConfig`] and the seed. Each call to
//! [`simulate_timestep`](BushfireSimulation::simulate_timestep) computes the
//! next grid into the scratch buffer and swaps the two, so every query sees a
//! fully committed grid.
//!
//! # Example
//!
//! ```
//! use bushfire_core::{BushfireSimulation, VegetationType, WeatherCondition, DEFAULT_TIMESTEP};
//!
//! let mut sim = BushfireSimulation::new(10, 10, 42);
//! sim.initialize_terrain_from_data(
//!     &[100.0; 100],
//!     &[12.0; 100],
//!     &[VegetationType::Dense; 100],
//! )?;
//! sim.ignite(5, 5)?;
//!
//! let weather = WeatherCondition::default();
//! for _ in 0..10 {
//!     sim.simulate_timestep(&weather, DEFAULT_TIMESTEP)?;
//! }
//! assert_eq!(sim.step_count(), 10);
//! assert!(sim.get_fire_perimeter_count().0 >= 1);
//! # Ok::<(), bushfire_core::SimulationError>(())
//! ```

pub mod analysis;
pub mod stats;

use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::core_types::units::Hectares;
use crate::core_types::weather::WeatherCondition;
use crate::error::{Result, SimulationError};
use crate::grid::{CellState, TerrainCell, TerrainGrid, VegetationType};
use crate::solver::{advance, StepContext};

pub use stats::SimulationStatistics;

/// Grid-based probabilistic fire spread simulation
#[derive(Debug, Clone)]
pub struct BushfireSimulation {
    /// Committed grid visible to queries
    grid: TerrainGrid,
    /// Buffer the next step is written into
    scratch: TerrainGrid,
    config: SimulationConfig,
    seed: u64,
    step_count: u64,
}

impl BushfireSimulation {
    /// Create a `width x height` simulation with the default configuration
    ///
    /// Cells start as flat moderate vegetation until
    /// [`initialize_terrain_from_data`](Self::initialize_terrain_from_data) is called.
    #[must_use]
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        Self::build(width, height, seed, SimulationConfig::default())
    }

    /// Create a simulation with explicit tunables
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidInput`] if `config` fails
    /// [`SimulationConfig::validate`].
    pub fn with_config(
        width: usize,
        height: usize,
        seed: u64,
        config: SimulationConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(width, height, seed, config))
    }

    fn build(width: usize, height: usize, seed: u64, config: SimulationConfig) -> Self {
        let grid = TerrainGrid::new(width, height);
        info!(
            "Bushfire simulation created: {}x{} grid, cell_size={}, seed={}",
            width, height, config.cell_size, seed
        );
        Self {
            scratch: grid.clone(),
            grid,
            config,
            seed,
            step_count: 0,
        }
    }

    /// Load terrain for every cell
    ///
    /// # Arguments
    ///
    /// * `elevations` - Row-major elevation (m)
    /// * `fuel_loads` - Row-major fuel load (t/ha); `<= 0` marks a cell empty
    /// * `vegetation_types` - Row-major vegetation class
    ///
    /// # Errors
    ///
    /// [`SimulationError::SizeMismatch`] if any slice is not `width * height`
    /// long, [`SimulationError::InvalidInput`] for non-finite values. The grid
    /// is unchanged on error.
    pub fn initialize_terrain_from_data(
        &mut self,
        elevations: &[f64],
        fuel_loads: &[f64],
        vegetation_types: &[VegetationType],
    ) -> Result<()> {
        self.grid.initialize_from_data(
            elevations,
            fuel_loads,
            vegetation_types,
            self.config.cell_size,
        )?;

        let counts = stats::state_counts(&self.grid);
        info!(
            "Terrain initialized: {} cells, {} vegetated, {} empty",
            self.grid.len(),
            counts[CellState::Vegetation as usize],
            counts[CellState::Empty as usize]
        );
        Ok(())
    }

    /// Start a fire at `(x, y)`
    ///
    /// # Errors
    ///
    /// [`SimulationError::OutOfBounds`] outside the grid;
    /// [`SimulationError::NotIgnitable`] for empty, burning, burnt or depleted cells.
    pub fn ignite(&mut self, x: usize, y: usize) -> Result<()> {
        self.grid.ignite(x, y, self.config.burnout_threshold)?;
        debug!("Ignited cell ({}, {})", x, y);
        Ok(())
    }

    /// Advance the fire by one timestep
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidWeather`] for out-of-range weather and
    /// [`SimulationError::InvalidInput`] for a non-finite or non-positive `dt`.
    /// Nothing is mutated on error.
    pub fn simulate_timestep(&mut self, weather: &WeatherCondition, dt: f64) -> Result<()> {
        Self::validate_step(weather, dt)?;

        let ctx = StepContext {
            weather,
            dt,
            config: &self.config,
            seed: self.seed,
            step: self.step_count,
        };
        advance(&self.grid, &mut self.scratch, &ctx);
        std::mem::swap(&mut self.grid, &mut self.scratch);
        self.step_count += 1;

        if tracing::enabled!(tracing::Level::DEBUG) {
            let counts = stats::state_counts(&self.grid);
            debug!(
                "Step {}: dt={:.3}, burning={}, burnt={}, FFDI={:.1}",
                self.step_count,
                dt,
                counts[CellState::Burning as usize],
                counts[CellState::Burnt as usize],
                weather.fire_danger_index()
            );
        }
        Ok(())
    }

    pub(crate) fn validate_step(weather: &WeatherCondition, dt: f64) -> Result<()> {
        weather.validate()?;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimulationError::InvalidInput(format!(
                "timestep must be finite and positive, got {dt}"
            )));
        }
        Ok(())
    }

    /// Run `steps` timesteps under fixed weather, recording cell states
    ///
    /// Returns the initial state codes followed by one snapshot per step
    /// (`steps + 1` entries).
    ///
    /// # Errors
    ///
    /// Same as [`simulate_timestep`](Self::simulate_timestep); inputs are
    /// checked before the first step.
    pub fn run_batch(
        &mut self,
        weather: &WeatherCondition,
        dt: f64,
        steps: usize,
    ) -> Result<Vec<Vec<u8>>> {
        Self::validate_step(weather, dt)?;
        let mut snapshots = Vec::with_capacity(steps + 1);
        snapshots.push(self.cell_states());
        for _ in 0..steps {
            self.simulate_timestep(weather, dt)?;
            snapshots.push(self.cell_states());
        }
        Ok(snapshots)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Steps completed so far
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The committed grid
    #[must_use]
    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    /// Cell at `(x, y)`, or `None` outside the grid
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<&TerrainCell> {
        self.grid.cell(x, y)
    }

    /// All cells in row-major order
    #[must_use]
    pub fn cells(&self) -> &[TerrainCell] {
        self.grid.cells()
    }

    #[must_use]
    pub fn statistics(&self) -> SimulationStatistics {
        SimulationStatistics::collect(&self.grid, &self.config, self.step_count)
    }

    /// Row-major state codes (0 empty, 1 vegetation, 2 burning, 3 burnt)
    #[must_use]
    pub fn cell_states(&self) -> Vec<u8> {
        stats::cell_states(&self.grid)
    }

    /// Row-major burn intensity
    #[must_use]
    pub fn get_burn_intensity_grid(&self) -> Vec<f64> {
        stats::burn_intensity_grid(&self.grid)
    }

    /// Row-major burned mask
    #[must_use]
    pub fn get_burned_areas(&self) -> Vec<bool> {
        stats::burned_areas(&self.grid, &self.config)
    }

    /// Row-major remaining fuel fraction
    #[must_use]
    pub fn get_fuel_remaining(&self) -> Vec<f64> {
        stats::fuel_remaining_grid(&self.grid)
    }

    /// Burned area in hectares
    #[must_use]
    pub fn get_total_burned_area(&self) -> Hectares {
        stats::total_burned_area(&self.grid, &self.config)
    }

    #[must_use]
    pub fn get_maximum_intensity(&self) -> f64 {
        stats::maximum_intensity(&self.grid)
    }

    /// `(active fires, perimeter cells)`
    #[must_use]
    pub fn get_fire_perimeter_count(&self) -> (usize, usize) {
        stats::fire_perimeter_count(&self.grid)
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut TerrainGrid {
        &mut self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TIMESTEP;
    use crate::DangerLevel;

    fn sim(width: usize, height: usize, seed: u64) -> BushfireSimulation {
        let n = width * height;
        let mut sim = BushfireSimulation::new(width, height, seed);
        sim.initialize_terrain_from_data(
            &vec![0.0; n],
            &vec![10.0; n],
            &vec![VegetationType::Moderate; n],
        )
        .unwrap();
        sim
    }

    #[test]
    fn test_invalid_weather_rejected_before_mutation() {
        let mut s = sim(5, 5, 1);
        s.ignite(2, 2).unwrap();
        let before = s.cells().to_vec();

        let weather = WeatherCondition {
            humidity: 120.0,
            ..WeatherCondition::default()
        };
        assert!(matches!(
            s.simulate_timestep(&weather, 0.1),
            Err(SimulationError::InvalidWeather { .. })
        ));
        assert_eq!(s.cells(), before.as_slice());
        assert_eq!(s.step_count(), 0);
    }

    #[test]
    fn test_invalid_timestep_rejected() {
        let mut s = sim(3, 3, 1);
        let weather = WeatherCondition::default();
        for dt in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                s.simulate_timestep(&weather, dt),
                Err(SimulationError::InvalidInput(_))
            ));
        }
        assert_eq!(s.step_count(), 0);
    }

    #[test]
    fn test_with_config_validates() {
        let config = SimulationConfig {
            base_spread_rate: -1.0,
            ..SimulationConfig::default()
        };
        assert!(BushfireSimulation::with_config(4, 4, 0, config).is_err());
        assert!(BushfireSimulation::with_config(4, 4, 0, SimulationConfig::default()).is_ok());
    }

    #[test]
    fn test_steps_increment_and_burn_monotonic() {
        let mut s = sim(12, 12, 5);
        s.ignite(6, 6).unwrap();
        let weather = WeatherCondition::from_danger_level(DangerLevel::Extreme);

        let mut previous = s.cells().to_vec();
        for _ in 0..40 {
            s.simulate_timestep(&weather, 1.0).unwrap();
            for (before, after) in previous.iter().zip(s.cells()) {
                assert!(after.fuel_remaining() <= before.fuel_remaining());
                match before.state() {
                    CellState::Burnt => assert_eq!(after.state(), CellState::Burnt),
                    CellState::Burning => assert_ne!(after.state(), CellState::Vegetation),
                    _ => {}
                }
            }
            previous = s.cells().to_vec();
        }
        assert_eq!(s.step_count(), 40);
        assert!(s.statistics().burned_cells >= 1);
    }

    #[test]
    fn test_run_batch_snapshots() {
        let mut s = sim(4, 4, 9);
        s.ignite(0, 0).unwrap();
        let snapshots = s
            .run_batch(&WeatherCondition::default(), DEFAULT_TIMESTEP, 5)
            .unwrap();
        assert_eq!(snapshots.len(), 6);
        assert_eq!(snapshots[0][0], CellState::Burning.code());
        assert!(snapshots.iter().all(|snap| snap.len() == 16));
        assert_eq!(snapshots.last(), Some(&s.cell_states()));
        assert_eq!(s.step_count(), 5);

        assert!(s.run_batch(&WeatherCondition::default(), 0.0, 3).is_err());
        assert_eq!(s.step_count(), 5);
    }

    #[test]
    fn test_fuel_exhaustion_through_facade() {
        let mut s = sim(3, 3, 2);
        s.ignite(1, 1).unwrap();
        s.grid_mut().cells_mut()[4].fuel_remaining = 0.015;
        s.simulate_timestep(&WeatherCondition::default(), 0.2).unwrap();
        assert_eq!(s.cell(1, 1).unwrap().state(), CellState::Burnt);
        assert_eq!(s.cell(1, 1).unwrap().burn_intensity(), 0.0);
    }
}
