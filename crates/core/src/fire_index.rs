//! Australian fire danger indices and the rating ladder
//!
//! Implements the McArthur Mark 5 Forest Fire Danger Index (FFDI) and the
//! Grassland Fire Danger Index (GFDI) as closed-form equations, plus the
//! mapping from an index value to a [`FireDangerRating`].
//!
//! All functions are pure: no clamping, no error path. Out-of-range inputs
//! simply produce out-of-range index values.
//!
//! # References
//!
//! - Noble, I.R., Bary, G.A.V., Gill, A.M. (1980). "McArthur's fire-danger meters
//!   expressed as equations." Australian Journal of Ecology, 5(2), 201-203.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rating bands for fire danger index values
///
/// Lower bound inclusive, upper bound exclusive.
pub mod fdi_ranges {
    use std::ops::{Range, RangeFrom};

    /// "Low" rating `[0.0, 5.0)`
    pub const LOW: Range<f64> = 0.0..5.0;

    /// "Moderate" rating `[5.0, 12.0)`
    pub const MODERATE: Range<f64> = 5.0..12.0;

    /// "High" rating `[12.0, 25.0)`
    pub const HIGH: Range<f64> = 12.0..25.0;

    /// "Very High" rating `[25.0, 50.0)`
    pub const VERY_HIGH: Range<f64> = 25.0..50.0;

    /// "Severe" rating `[50.0, 75.0)`
    pub const SEVERE: Range<f64> = 50.0..75.0;

    /// "Extreme" rating `[75.0, 100.0)`
    pub const EXTREME: Range<f64> = 75.0..100.0;

    /// "Catastrophic" rating `[100.0, ∞)`
    pub const CATASTROPHIC: RangeFrom<f64> = 100.0..;
}

/// Fire danger rating ladder, ordered from least to most dangerous
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FireDangerRating {
    Low = 0,
    Moderate = 1,
    High = 2,
    VeryHigh = 3,
    Severe = 4,
    Extreme = 5,
    Catastrophic = 6,
}

impl FireDangerRating {
    /// Human-readable category name ("Very High" etc.)
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FireDangerRating::Low => "Low",
            FireDangerRating::Moderate => "Moderate",
            FireDangerRating::High => "High",
            FireDangerRating::VeryHigh => "Very High",
            FireDangerRating::Severe => "Severe",
            FireDangerRating::Extreme => "Extreme",
            FireDangerRating::Catastrophic => "Catastrophic",
        }
    }
}

impl fmt::Display for FireDangerRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// McArthur Mark 5 Forest Fire Danger Index
///
/// `FFDI = 2 * exp(-0.45 + 0.987 * ln(DF) - 0.0345 * H + 0.0338 * T + 0.0234 * V)`
///
/// # Arguments
///
/// * `temperature` - Air temperature (°C)
/// * `humidity` - Relative humidity (%)
/// * `wind_speed` - 10 m wind speed (km/h)
/// * `drought_factor` - Drought factor (1-10)
///
/// # Returns
///
/// The FFDI value (unitless, typically 0-150)
#[must_use]
pub fn mcarthur_forest_fire_danger_index(
    temperature: f64,
    humidity: f64,
    wind_speed: f64,
    drought_factor: f64,
) -> f64 {
    let exponent = -0.45 + 0.987 * drought_factor.ln() - 0.0345 * humidity
        + 0.0338 * temperature
        + 0.0234 * wind_speed;
    2.0 * exponent.exp()
}

/// Grassland Fire Danger Index
///
/// `GFDI = 3.35 * W * exp(-0.0231 * M) * (0.054 + 0.209 * V) * exp(0.0365 * T - 0.0345 * H)`
///
/// # Arguments
///
/// * `temperature` - Air temperature (°C)
/// * `humidity` - Relative humidity (%)
/// * `wind_speed` - Wind speed (km/h)
/// * `fuel_load` - Grass fuel load (t/ha)
/// * `fuel_moisture` - Grass fuel moisture content (%)
#[must_use]
pub fn grassland_fire_danger_index(
    temperature: f64,
    humidity: f64,
    wind_speed: f64,
    fuel_load: f64,
    fuel_moisture: f64,
) -> f64 {
    3.35 * fuel_load
        * (-0.0231 * fuel_moisture).exp()
        * (0.054 + 0.209 * wind_speed)
        * (0.0365 * temperature - 0.0345 * humidity).exp()
}

/// Map a fire danger index value onto the rating ladder
///
/// See [`fdi_ranges`] for the band boundaries. Values below zero (or NaN)
/// rate as [`FireDangerRating::Low`].
#[must_use]
pub fn fdi_to_rating(fdi: f64) -> FireDangerRating {
    match fdi {
        _ if fdi_ranges::CATASTROPHIC.contains(&fdi) => FireDangerRating::Catastrophic,
        _ if fdi_ranges::EXTREME.contains(&fdi) => FireDangerRating::Extreme,
        _ if fdi_ranges::SEVERE.contains(&fdi) => FireDangerRating::Severe,
        _ if fdi_ranges::VERY_HIGH.contains(&fdi) => FireDangerRating::VeryHigh,
        _ if fdi_ranges::HIGH.contains(&fdi) => FireDangerRating::High,
        _ if fdi_ranges::MODERATE.contains(&fdi) => FireDangerRating::Moderate,
        _ => FireDangerRating::Low,
    }
}

/// Category name for a fire danger index value
#[must_use]
pub fn danger_rating_category(fdi: f64) -> &'static str {
    fdi_to_rating(fdi).as_str()
}
