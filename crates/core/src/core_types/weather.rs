//! Per-step weather input and named danger-level presets
//!
//! A [`WeatherCondition`] is a plain value supplied by the caller on every
//! timestep. The grid never owns weather; the same grid can be stepped under a
//! different condition each tick.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SimulationError};
use crate::fire_index::{self, FireDangerRating};

/// Accepted temperature range (°C)
pub const TEMPERATURE_RANGE: (f64, f64) = (-50.0, 60.0);
/// Accepted relative humidity range (%)
pub const HUMIDITY_RANGE: (f64, f64) = (0.0, 100.0);
/// Accepted wind speed range (km/h)
pub const WIND_SPEED_RANGE: (f64, f64) = (0.0, 200.0);

/// Weather driving one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    /// Air temperature (°C)
    pub temperature: f64,
    /// Relative humidity (0-100 %)
    pub humidity: f64,
    /// Wind speed (km/h)
    pub wind_speed: f64,
    /// Direction the wind blows towards, degrees (0 = +x axis)
    pub wind_direction: f64,
    /// Rainfall over the last 24 h (mm)
    pub rainfall: f64,
    /// Dead fuel moisture content (0-100 %)
    pub fuel_moisture: f64,
}

impl Default for WeatherCondition {
    fn default() -> Self {
        Self {
            temperature: 20.0,
            humidity: 50.0,
            wind_speed: 10.0,
            wind_direction: 0.0,
            rainfall: 0.0,
            fuel_moisture: 10.0,
        }
    }
}

impl WeatherCondition {
    /// Create a weather condition from explicit values
    #[must_use]
    pub fn new(
        temperature: f64,
        humidity: f64,
        wind_speed: f64,
        wind_direction: f64,
        rainfall: f64,
        fuel_moisture: f64,
    ) -> Self {
        Self {
            temperature,
            humidity,
            wind_speed,
            wind_direction,
            rainfall,
            fuel_moisture,
        }
    }

    /// Build the preset weather for a named danger level
    ///
    /// Wind blows towards 0°, no rain, and fuel moisture tracks humidity
    /// (`max(5, humidity * 0.3)`).
    #[must_use]
    pub fn from_danger_level(level: DangerLevel) -> Self {
        let (wind_speed, humidity, temperature) = level.preset();
        Self {
            temperature,
            humidity,
            wind_speed,
            wind_direction: 0.0,
            rainfall: 0.0,
            fuel_moisture: (humidity * 0.3).max(5.0),
        }
    }

    /// Check the condition against the accepted ranges
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidWeather`] naming the first field that is
    /// non-finite or outside its range.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("wind_speed", self.wind_speed),
            ("wind_direction", self.wind_direction),
            ("rainfall", self.rainfall),
            ("fuel_moisture", self.fuel_moisture),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SimulationError::InvalidWeather {
                reason: format!("{name} must be finite, got {value}"),
            });
        }

        let ranged = [
            ("temperature", self.temperature, TEMPERATURE_RANGE),
            ("humidity", self.humidity, HUMIDITY_RANGE),
            ("wind_speed", self.wind_speed, WIND_SPEED_RANGE),
        ];
        for (name, value, (lo, hi)) in ranged {
            if !(lo..=hi).contains(&value) {
                return Err(SimulationError::InvalidWeather {
                    reason: format!("{name} {value} outside [{lo}, {hi}]"),
                });
            }
        }
        Ok(())
    }

    /// `true` if [`validate`](Self::validate) would succeed
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Drought factor derived from rainfall: `max(1, 10 - rainfall / 10)`
    #[must_use]
    pub fn drought_factor(&self) -> f64 {
        (10.0 - self.rainfall / 10.0).max(1.0)
    }

    /// McArthur Forest Fire Danger Index for this condition
    #[must_use]
    pub fn fire_danger_index(&self) -> f64 {
        fire_index::mcarthur_forest_fire_danger_index(
            self.temperature,
            self.humidity,
            self.wind_speed,
            self.drought_factor(),
        )
    }

    /// Danger rating for [`fire_danger_index`](Self::fire_danger_index)
    #[must_use]
    pub fn fire_danger_rating(&self) -> FireDangerRating {
        fire_index::fdi_to_rating(self.fire_danger_index())
    }
}

/// Named danger levels with demonstration weather presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DangerLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Severe,
    Extreme,
    Catastrophic,
}

impl DangerLevel {
    /// All levels, mildest first
    pub const ALL: [DangerLevel; 7] = [
        DangerLevel::Low,
        DangerLevel::Moderate,
        DangerLevel::High,
        DangerLevel::VeryHigh,
        DangerLevel::Severe,
        DangerLevel::Extreme,
        DangerLevel::Catastrophic,
    ];

    /// Preset as (wind km/h, humidity %, temperature °C)
    #[must_use]
    pub fn preset(self) -> (f64, f64, f64) {
        match self {
            DangerLevel::Low => (15.0, 65.0, 25.0),
            DangerLevel::Moderate => (20.0, 50.0, 30.0),
            DangerLevel::High => (30.0, 35.0, 35.0),
            DangerLevel::VeryHigh => (40.0, 25.0, 40.0),
            DangerLevel::Severe => (50.0, 15.0, 45.0),
            DangerLevel::Extreme => (65.0, 8.0, 48.0),
            DangerLevel::Catastrophic => (80.0, 5.0, 50.0),
        }
    }

    /// Lower-case identifier accepted by [`FromStr`]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DangerLevel::Low => "low",
            DangerLevel::Moderate => "moderate",
            DangerLevel::High => "high",
            DangerLevel::VeryHigh => "very_high",
            DangerLevel::Severe => "severe",
            DangerLevel::Extreme => "extreme",
            DangerLevel::Catastrophic => "catastrophic",
        }
    }
}

impl fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DangerLevel {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self> {
        DangerLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SimulationError::InvalidInput(format!("unknown danger level: {s}")))
    }
}
