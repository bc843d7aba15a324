//! Fire spread engine
//!
//! The spread step is a probabilistic cellular automaton:
//!
//! - [`spread`]: closed-form terms (consumption, wind, slope, spread rate,
//!   ignition probability)
//! - [`step`]: the synchronous double-buffered update, parallel over rows
//! - [`rng`]: per-row and per-trial RNG stream derivation
//!
//! # Example
//!
//! ```
//! use bushfire_core::solver::spread::{ignition_probability, spread_rate};
//! use bushfire_core::{SimulationConfig, TerrainCell, VegetationType, WeatherCondition};
//!
//! let config = SimulationConfig::default();
//! let weather = WeatherCondition::default();
//! let source = TerrainCell::new(0.0, 10.0, VegetationType::Moderate);
//! let target = TerrainCell::new(0.0, 10.0, VegetationType::Dense);
//!
//! let rate = spread_rate(&source, &target, 1.0, 0.0, &weather, &config);
//! assert!(ignition_probability(rate, 0.1, &config) > 0.0);
//! ```

pub mod rng;
pub mod spread;
pub mod step;

pub use step::{advance, StepContext};
