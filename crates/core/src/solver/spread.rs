//! Closed-form fire behaviour terms used by the spread step
//!
//! All functions are pure. Constants come from [`SimulationConfig`] so tests
//! can vary them.

use crate::config::SimulationConfig;
use crate::core_types::weather::WeatherCondition;
use crate::grid::TerrainCell;

/// Fraction of fuel a burning cell consumes per unit time
///
/// `base_consumption * (1 + fuel_load / fuel_load_normalisation)`
#[inline]
#[must_use]
pub fn consumption_rate(fuel_load: f64, config: &SimulationConfig) -> f64 {
    config.base_consumption * (1.0 + fuel_load / config.fuel_load_normalisation)
}

/// Burn intensity of a cell that has `fuel_remaining` of `fuel_load` left
#[inline]
#[must_use]
pub fn burn_intensity(fuel_load: f64, fuel_remaining: f64, config: &SimulationConfig) -> f64 {
    fuel_load * (1.0 - fuel_remaining) * config.intensity_scale
}

/// Wind contribution for spread along the offset `(dx, dy)` (target - source)
///
/// `(wind_speed / wind_normalisation) * max(0, cos(atan2(dy, dx) - wind_direction))`
///
/// Only the downwind half-plane is boosted; crosswind and upwind spread get no
/// wind term.
#[inline]
#[must_use]
pub fn wind_effect(dx: f64, dy: f64, weather: &WeatherCondition, config: &SimulationConfig) -> f64 {
    let direction_diff = dy.atan2(dx).to_degrees() - weather.wind_direction;
    (weather.wind_speed / config.wind_normalisation) * direction_diff.to_radians().cos().max(0.0)
}

/// Slope contribution for spread from `source_elevation` to `target_elevation`
///
/// `tan(atan(Δelevation / cell_size)) * slope_coefficient`. Positive uphill,
/// negative downhill.
#[inline]
#[must_use]
pub fn slope_effect(source_elevation: f64, target_elevation: f64, config: &SimulationConfig) -> f64 {
    let rise = (target_elevation - source_elevation) / *config.cell_size;
    rise.atan().tan() * config.slope_coefficient
}

/// Spread rate from a burning `source` into `target` at offset `(dx, dy)`
///
/// # Arguments
///
/// * `source` - The burning cell
/// * `target` - The candidate cell (vegetation class and remaining fuel are read here)
/// * `dx`, `dy` - Target position minus source position, in cells
/// * `weather` - Weather for this step
/// * `config` - Simulation constants
///
/// # Returns
///
/// `base_spread_rate * fuel_multiplier(target) * exp(-moisture_coefficient * fuel_moisture)
///  * (1 + wind_effect) * (1 + slope_effect) * target.fuel_remaining`
///
/// May be negative on steep downhill runs; [`ignition_probability`] clamps it.
#[must_use]
pub fn spread_rate(
    source: &TerrainCell,
    target: &TerrainCell,
    dx: f64,
    dy: f64,
    weather: &WeatherCondition,
    config: &SimulationConfig,
) -> f64 {
    let moisture_damping = (-config.moisture_coefficient * weather.fuel_moisture).exp();
    config.base_spread_rate
        * target.vegetation_type.fuel_multiplier()
        * moisture_damping
        * (1.0 + wind_effect(dx, dy, weather, config))
        * (1.0 + slope_effect(source.elevation, target.elevation, config))
        * target.fuel_remaining
}

/// Probability that one burning neighbour ignites the target within `dt`
///
/// `clamp(spread_rate * dt * ignition_scale, 0, 1)`
#[inline]
#[must_use]
pub fn ignition_probability(spread_rate: f64, dt: f64, config: &SimulationConfig) -> f64 {
    (spread_rate * dt * config.ignition_scale).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::VegetationType;
    use approx::assert_relative_eq;

    fn scenario_weather() -> WeatherCondition {
        WeatherCondition::new(38.0, 20.0, 45.0, 0.0, 0.0, 10.0)
    }

    #[test]
    fn test_consumption_rate() {
        let config = SimulationConfig::default();
        assert_relative_eq!(consumption_rate(10.0, &config), 0.03);
        assert_relative_eq!(consumption_rate(0.0, &config), 0.02);
        assert_relative_eq!(consumption_rate(40.0, &config), 0.06);
    }

    #[test]
    fn test_wind_effect_direction() {
        let config = SimulationConfig::default();
        let weather = scenario_weather();
        // Directly downwind (+x with wind towards 0°)
        assert_relative_eq!(wind_effect(1.0, 0.0, &weather, &config), 4.5, epsilon = 1e-12);
        // Diagonal downwind
        assert_relative_eq!(
            wind_effect(1.0, 1.0, &weather, &config),
            4.5 * std::f64::consts::FRAC_1_SQRT_2,
            epsilon = 1e-12
        );
        // Crosswind and upwind get nothing
        assert!(wind_effect(0.0, 1.0, &weather, &config).abs() < 1e-12);
        assert_eq!(wind_effect(-1.0, 0.0, &weather, &config), 0.0);
    }

    #[test]
    fn test_slope_effect_sign() {
        let config = SimulationConfig::default();
        assert_relative_eq!(slope_effect(100.0, 115.0, &config), 1.0, epsilon = 1e-12);
        assert_relative_eq!(slope_effect(115.0, 100.0, &config), -1.0, epsilon = 1e-12);
        assert_eq!(slope_effect(50.0, 50.0, &config), 0.0);
    }

    #[test]
    fn test_spread_rate_hand_computed() {
        // 0.1 * 1.0 * exp(-0.5) * (1 + 4.5) * (1 + 0) * 1.0
        let config = SimulationConfig::default();
        let weather = scenario_weather();
        let source = TerrainCell::new(0.0, 10.0, VegetationType::Moderate);
        let target = TerrainCell::new(0.0, 10.0, VegetationType::Moderate);

        let rate = spread_rate(&source, &target, 1.0, 0.0, &weather, &config);
        let expected = 0.1 * (-0.5_f64).exp() * 5.5;
        assert_relative_eq!(rate, expected, epsilon = 1e-12);
        assert_relative_eq!(rate, 0.333_592, epsilon = 1e-6);

        let p = ignition_probability(rate, 0.1, &config);
        assert_relative_eq!(p, 0.003_335_92, epsilon = 1e-8);

        // Upwind neighbour has no wind boost
        let upwind = spread_rate(&source, &target, -1.0, 0.0, &weather, &config);
        assert_relative_eq!(upwind, 0.1 * (-0.5_f64).exp(), epsilon = 1e-12);
        assert!(ignition_probability(upwind, 0.1, &config) < p);
    }

    #[test]
    fn test_spread_rate_uses_target_fuel_and_vegetation() {
        let config = SimulationConfig::default();
        let weather = WeatherCondition::new(30.0, 30.0, 0.0, 0.0, 0.0, 0.0);
        let source = TerrainCell::new(0.0, 10.0, VegetationType::Sparse);
        let mut target = TerrainCell::new(0.0, 10.0, VegetationType::Extreme);
        assert_relative_eq!(
            spread_rate(&source, &target, 0.0, 1.0, &weather, &config),
            0.4,
            epsilon = 1e-12
        );

        target.fuel_remaining = 0.5;
        assert_relative_eq!(
            spread_rate(&source, &target, 0.0, 1.0, &weather, &config),
            0.2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_ignition_probability_clamped() {
        let config = SimulationConfig::default();
        assert_eq!(ignition_probability(-3.0, 1.0, &config), 0.0);
        assert_eq!(ignition_probability(500.0, 1.0, &config), 1.0);
        assert_relative_eq!(ignition_probability(2.0, 0.5, &config), 0.1);
    }
}
