//! Immutable simulation tunables
//!
//! Every constant used by the spread engine and the analysis routines lives
//! here so tests and callers can vary them without touching module-level
//! constants. A [`SimulationConfig`] is fixed at construction time.

use serde::{Deserialize, Serialize};

use crate::core_types::units::Meters;
use crate::error::{Result, SimulationError};

/// Default timestep used by callers that do not pick one
pub const DEFAULT_TIMESTEP: f64 = 0.1;

/// Tunable constants for the cellular automaton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Side length of one square grid cell
    pub cell_size: Meters,
    /// Base spread rate before fuel, moisture, wind and slope factors
    pub base_spread_rate: f64,
    /// Base fraction of fuel consumed per unit time by a burning cell
    pub base_consumption: f64,
    /// Fuel load (t/ha) that doubles the consumption rate
    pub fuel_load_normalisation: f64,
    /// A burning cell whose remaining fuel drops below this burns out
    pub burnout_threshold: f64,
    /// Cells with remaining fuel below this count as burned
    pub burned_threshold: f64,
    /// Scale from `spread_rate * dt` to ignition probability
    pub ignition_scale: f64,
    /// Scale from consumed fuel to burn intensity
    pub intensity_scale: f64,
    /// Multiplier on the slope gradient term
    pub slope_coefficient: f64,
    /// Exponential decay of spread with fuel moisture
    pub moisture_coefficient: f64,
    /// Wind speed (km/h) that adds one unit of wind effect
    pub wind_normalisation: f64,
    /// Distance (cells) over which risk decays by a factor of e
    pub risk_distance_decay: f64,
    /// Steps per Monte Carlo trial
    pub monte_carlo_steps: usize,
    /// Timestep of each Monte Carlo step
    pub monte_carlo_dt: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cell_size: Meters::new(30.0),
            base_spread_rate: 0.1,
            base_consumption: 0.02,
            fuel_load_normalisation: 20.0,
            burnout_threshold: 0.01,
            burned_threshold: 0.9,
            ignition_scale: 0.1,
            intensity_scale: 0.1,
            slope_coefficient: 2.0,
            moisture_coefficient: 0.05,
            wind_normalisation: 10.0,
            risk_distance_decay: 50.0,
            monte_carlo_steps: 100,
            monte_carlo_dt: DEFAULT_TIMESTEP,
        }
    }
}

impl SimulationConfig {
    /// Reject configurations the engine cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidInput`] if any value is non-finite or
    /// non-positive, or if `monte_carlo_steps` is zero.
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("cell_size", *self.cell_size),
            ("base_spread_rate", self.base_spread_rate),
            ("base_consumption", self.base_consumption),
            ("fuel_load_normalisation", self.fuel_load_normalisation),
            ("burnout_threshold", self.burnout_threshold),
            ("burned_threshold", self.burned_threshold),
            ("ignition_scale", self.ignition_scale),
            ("intensity_scale", self.intensity_scale),
            ("slope_coefficient", self.slope_coefficient),
            ("moisture_coefficient", self.moisture_coefficient),
            ("wind_normalisation", self.wind_normalisation),
            ("risk_distance_decay", self.risk_distance_decay),
            ("monte_carlo_dt", self.monte_carlo_dt),
        ];
        for (name, value) in values {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimulationError::InvalidInput(format!(
                    "config {name} must be finite and positive, got {value}"
                )));
            }
        }
        if self.monte_carlo_steps == 0 {
            return Err(SimulationError::InvalidInput(
                "config monte_carlo_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(*config.cell_size, 30.0);
        assert_eq!(config.monte_carlo_steps, 100);
        assert_eq!(config.monte_carlo_dt, DEFAULT_TIMESTEP);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let config = SimulationConfig {
            cell_size: Meters::new(0.0),
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            risk_distance_decay: f64::NAN,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            monte_carlo_steps: 0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
