//! Core value types shared across the simulation
//!
//! - [`units`]: typed distances, angles and areas
//! - [`weather`]: per-step weather input and danger-level presets

pub mod units;
pub mod weather;

pub use units::{Degrees, Hectares, Meters};
pub use weather::{DangerLevel, WeatherCondition};
