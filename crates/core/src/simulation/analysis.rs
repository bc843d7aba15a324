//! Risk surfaces and Monte Carlo burn probability
//!
//! Both analyses read the committed grid and never mutate the simulation.
//!
//! # Risk surface
//!
//! For every cell, the maximum over candidate ignition points of
//!
//! ```text
//! (FFDI / 100) * exp(-distance / risk_distance_decay) * (fuel_load / fuel_load_normalisation) * veg_weight
//! ```
//!
//! with `distance` the Euclidean distance in cells.
//!
//! # Monte Carlo
//!
//! Each trial draws a weather scenario and an ignition point from its own RNG
//! stream, runs a short simulation on a copy of the grid and records which
//! cells burned. Per-cell integer counts are merged with a parallel
//! fold/reduce, then divided by the trial count, so the output depends only on
//! the simulation seed.

use rand::Rng;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::core_types::weather::WeatherCondition;
use crate::error::{Result, SimulationError};
use crate::solver::rng::trial_rng;

use super::BushfireSimulation;

impl BushfireSimulation {
    /// Per-cell fire risk around candidate ignition points
    ///
    /// # Arguments
    ///
    /// * `weather` - Weather used for the fire danger index
    /// * `ignition_points` - Candidate ignition cells `(x, y)`
    ///
    /// # Returns
    ///
    /// Row-major risk values; all zero when `ignition_points` is empty.
    ///
    /// # Errors
    ///
    /// [`SimulationError::OutOfBounds`] if any point lies outside the grid.
    pub fn calculate_risk_surface(
        &self,
        weather: &WeatherCondition,
        ignition_points: &[(usize, usize)],
    ) -> Result<Vec<f64>> {
        for &(x, y) in ignition_points {
            self.grid.check_bounds(x, y)?;
        }

        let width = self.grid.width();
        let mut risk = vec![0.0; self.grid.len()];
        if risk.is_empty() || ignition_points.is_empty() {
            return Ok(risk);
        }

        let danger = weather.fire_danger_index() / 100.0;
        let config = &self.config;
        let cells = self.grid.cells();

        risk.par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    let cell = &cells[y * width + x];
                    let fuel_factor = cell.fuel_load() / config.fuel_load_normalisation;
                    let veg_weight = cell.vegetation_type().risk_weight();

                    *out = ignition_points
                        .iter()
                        .map(|&(ix, iy)| {
                            let dx = x as f64 - ix as f64;
                            let dy = y as f64 - iy as f64;
                            let distance = dx.hypot(dy);
                            danger
                                * (-distance / config.risk_distance_decay).exp()
                                * fuel_factor
                                * veg_weight
                        })
                        .fold(0.0, f64::max);
                }
            });

        Ok(risk)
    }

    /// Probability that each cell burns, estimated over randomized trials
    ///
    /// # Arguments
    ///
    /// * `weather_scenarios` - Candidate weather, one picked uniformly per trial
    /// * `potential_ignitions` - Candidate ignition cells, one picked uniformly per trial
    /// * `num_simulations` - Number of trials
    ///
    /// # Returns
    ///
    /// Row-major burn probability in `[0, 1]`. A trial whose ignition cell
    /// cannot burn is skipped (logged) and contributes nothing.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::InvalidInput`] for empty inputs or zero trials
    /// - [`SimulationError::InvalidWeather`] if any scenario is invalid
    /// - [`SimulationError::OutOfBounds`] if any ignition point lies outside the grid
    pub fn monte_carlo_risk_analysis(
        &self,
        weather_scenarios: &[WeatherCondition],
        potential_ignitions: &[(usize, usize)],
        num_simulations: usize,
    ) -> Result<Vec<f64>> {
        if weather_scenarios.is_empty() {
            return Err(SimulationError::InvalidInput(
                "no weather scenarios supplied".to_string(),
            ));
        }
        if potential_ignitions.is_empty() {
            return Err(SimulationError::InvalidInput(
                "no potential ignition points supplied".to_string(),
            ));
        }
        if num_simulations == 0 {
            return Err(SimulationError::InvalidInput(
                "num_simulations must be at least 1".to_string(),
            ));
        }
        for weather in weather_scenarios {
            weather.validate()?;
        }
        for &(x, y) in potential_ignitions {
            self.grid.check_bounds(x, y)?;
        }

        info!(
            "Monte Carlo risk analysis: {} trials, {} scenarios, {} ignition points, {} steps each",
            num_simulations,
            weather_scenarios.len(),
            potential_ignitions.len(),
            self.config.monte_carlo_steps
        );

        let len = self.grid.len();
        let counts = (0..num_simulations)
            .into_par_iter()
            .fold(
                || vec![0_u64; len],
                |mut acc, trial| {
                    if let Some(burned) =
                        self.run_trial(trial, weather_scenarios, potential_ignitions)
                    {
                        tally_burned(&mut acc, &burned);
                    }
                    acc
                },
            )
            .reduce(
                || vec![0_u64; len],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                },
            );

        let n = num_simulations as f64;
        Ok(counts.into_iter().map(|c| c as f64 / n).collect())
    }

    /// Run one Monte Carlo trial; `None` if it had to be skipped
    fn run_trial(
        &self,
        trial: usize,
        weather_scenarios: &[WeatherCondition],
        potential_ignitions: &[(usize, usize)],
    ) -> Option<Vec<bool>> {
        let mut rng = trial_rng(self.seed, trial);
        let weather = &weather_scenarios[rng.random_range(0..weather_scenarios.len())];
        let (x, y) = potential_ignitions[rng.random_range(0..potential_ignitions.len())];

        let mut local = BushfireSimulation {
            grid: self.grid.clone(),
            scratch: self.grid.clone(),
            config: self.config.clone(),
            seed: rng.random(),
            step_count: 0,
        };

        if let Err(err) = local.ignite(x, y) {
            warn!("Monte Carlo trial {} skipped: {}", trial, err);
            return None;
        }
        for _ in 0..self.config.monte_carlo_steps {
            if let Err(err) = local.simulate_timestep(weather, self.config.monte_carlo_dt) {
                warn!("Monte Carlo trial {} aborted: {}", trial, err);
                return None;
            }
        }
        Some(local.get_burned_areas())
    }
}

/// Add one to every count whose cell burned
fn tally_burned(counts: &mut [u64], burned: &[bool]) {
    for (count, &hit) in counts.iter_mut().zip(burned) {
        *count += u64::from(hit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::VegetationType;
    use approx::assert_relative_eq;

    fn sim(width: usize, height: usize, seed: u64) -> BushfireSimulation {
        let n = width * height;
        let mut sim = BushfireSimulation::new(width, height, seed);
        sim.initialize_terrain_from_data(
            &vec![0.0; n],
            &vec![20.0; n],
            &vec![VegetationType::Extreme; n],
        )
        .unwrap();
        sim
    }

    #[test]
    fn test_risk_surface_peaks_at_ignition_point() {
        let s = sim(9, 9, 0);
        let weather = WeatherCondition::default();
        let risk = s.calculate_risk_surface(&weather, &[(4, 4)]).unwrap();
        let ffdi = weather.fire_danger_index();

        // fuel 20/20 and Extreme weight 1.0 leave only danger and decay
        assert_relative_eq!(risk[4 * 9 + 4], ffdi / 100.0, epsilon = 1e-12);
        assert_relative_eq!(
            risk[4 * 9 + 7],
            ffdi / 100.0 * (-3.0_f64 / 50.0).exp(),
            epsilon = 1e-12
        );
        let max = risk.iter().copied().fold(0.0, f64::max);
        assert_eq!(max, risk[4 * 9 + 4]);
    }

    #[test]
    fn test_risk_surface_takes_max_over_points() {
        let s = sim(10, 1, 0);
        let weather = WeatherCondition::default();
        let both = s.calculate_risk_surface(&weather, &[(0, 0), (9, 0)]).unwrap();
        let left = s.calculate_risk_surface(&weather, &[(0, 0)]).unwrap();
        let right = s.calculate_risk_surface(&weather, &[(9, 0)]).unwrap();
        for i in 0..10 {
            assert_eq!(both[i], left[i].max(right[i]));
        }
    }

    #[test]
    fn test_risk_surface_errors_and_empty_points() {
        let s = sim(4, 4, 0);
        let weather = WeatherCondition::default();
        assert!(matches!(
            s.calculate_risk_surface(&weather, &[(1, 1), (4, 0)]),
            Err(SimulationError::OutOfBounds { x: 4, y: 0, .. })
        ));
        let risk = s.calculate_risk_surface(&weather, &[]).unwrap();
        assert_eq!(risk, vec![0.0; 16]);
    }

    #[test]
    fn test_monte_carlo_input_validation() {
        let s = sim(4, 4, 0);
        let weather = [WeatherCondition::default()];
        assert!(matches!(
            s.monte_carlo_risk_analysis(&[], &[(1, 1)], 10),
            Err(SimulationError::InvalidInput(_))
        ));
        assert!(matches!(
            s.monte_carlo_risk_analysis(&weather, &[], 10),
            Err(SimulationError::InvalidInput(_))
        ));
        assert!(matches!(
            s.monte_carlo_risk_analysis(&weather, &[(1, 1)], 0),
            Err(SimulationError::InvalidInput(_))
        ));
        let bad = [WeatherCondition {
            temperature: 75.0,
            ..WeatherCondition::default()
        }];
        assert!(matches!(
            s.monte_carlo_risk_analysis(&bad, &[(1, 1)], 10),
            Err(SimulationError::InvalidWeather { .. })
        ));
        assert!(matches!(
            s.monte_carlo_risk_analysis(&weather, &[(9, 9)], 10),
            Err(SimulationError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_monte_carlo_is_seed_reproducible() {
        let s = sim(8, 8, 77);
        let weather = [
            WeatherCondition::default(),
            WeatherCondition::from_danger_level(crate::DangerLevel::Severe),
        ];
        let points = [(1, 1), (6, 6), (3, 5)];
        let a = s.monte_carlo_risk_analysis(&weather, &points, 24).unwrap();
        let b = s.monte_carlo_risk_analysis(&weather, &points, 24).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|p| (0.0..=1.0).contains(p)));
        // Ignition cells burn whenever they are chosen
        assert!(points.iter().any(|&(x, y)| a[y * 8 + x] > 0.0));
    }

    #[test]
    fn test_monte_carlo_skips_unignitable_trials() {
        let mut s = sim(3, 3, 4);
        s.ignite(1, 1).unwrap();
        let weather = [WeatherCondition::default()];
        // The only candidate is already burning, so every trial is skipped
        let risk = s.monte_carlo_risk_analysis(&weather, &[(1, 1)], 5).unwrap();
        assert_eq!(risk, vec![0.0; 9]);
        // The simulation itself is untouched
        assert_eq!(s.step_count(), 0);
        assert!(s.cell(1, 1).unwrap().is_ignited());
    }

    #[test]
    fn test_tally_counts_past_u32_range() {
        let mut counts = vec![u64::from(u32::MAX), 7, 0];
        tally_burned(&mut counts, &[true, false, true]);
        assert_eq!(counts, vec![u64::from(u32::MAX) + 1, 7, 1]);
    }
}
