//! Bushfire spread simulation core
//!
//! A grid-based, probabilistic cellular automaton for wildfire spread across
//! Australian terrain, with McArthur fire danger indices, risk surfaces and
//! Monte Carlo burn-probability analysis.
//!
//! # Overview
//!
//! - [`BushfireSimulation`]: owns the terrain grid and advances it one
//!   synchronous step at a time, in parallel across rows
//! - [`WeatherCondition`]: per-step weather input, never owned by the grid
//! - [`fire_index`]: FFDI / GFDI equations and the [`FireDangerRating`] ladder
//! - [`scenario`]: seeded weather scenario sets and synthetic terrain
//!
//! # Example
//!
//! ```
//! use bushfire_core::{scenario, BushfireSimulation, DangerLevel, WeatherCondition};
//!
//! let terrain = scenario::synthetic_terrain(32, 32, 7);
//! let mut sim = BushfireSimulation::new(32, 32, 7);
//! sim.initialize_terrain(&terrain)?;
//! sim.ignite(16, 16)?;
//!
//! let weather = WeatherCondition::from_danger_level(DangerLevel::Severe);
//! for _ in 0..20 {
//!     sim.simulate_timestep(&weather, 1.0)?;
//! }
//! let stats = sim.statistics();
//! assert_eq!(stats.step, 20);
//! # Ok::<(), bushfire_core::SimulationError>(())
//! ```
//!
//! Logging goes through `tracing`; install a subscriber in the host
//! application to see it.

pub mod config;
pub mod core_types;
pub mod error;
pub mod fire_index;
pub mod grid;
pub mod scenario;
pub mod simulation;
pub mod solver;

pub use config::{SimulationConfig, DEFAULT_TIMESTEP};
pub use core_types::units::{Degrees, Hectares, Meters};
pub use core_types::weather::{DangerLevel, WeatherCondition};
pub use error::{Result, SimulationError};
pub use fire_index::{
    danger_rating_category, fdi_ranges, fdi_to_rating, grassland_fire_danger_index,
    mcarthur_forest_fire_danger_index, FireDangerRating,
};
pub use grid::{CellState, TerrainCell, TerrainGrid, VegetationType};
pub use scenario::{generate_weather_scenarios, synthetic_terrain, TerrainData};
pub use simulation::{BushfireSimulation, SimulationStatistics};
