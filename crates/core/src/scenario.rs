//! Synthetic inputs: weather scenario sets and procedural terrain
//!
//! Both generators are seeded and deterministic. They produce data in the
//! shapes the simulation consumes, for demos, benchmarks and Monte Carlo runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core_types::weather::WeatherCondition;
use crate::error::Result;
use crate::grid::VegetationType;
use crate::simulation::BushfireSimulation;

/// Row-major terrain arrays for [`BushfireSimulation::initialize_terrain_from_data`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainData {
    pub width: usize,
    pub height: usize,
    /// Elevation (m)
    pub elevations: Vec<f64>,
    /// Fuel load (t/ha)
    pub fuel_loads: Vec<f64>,
    pub vegetation_types: Vec<VegetationType>,
}

/// Vegetation class weights: Sparse, Moderate, Dense, Extreme
const VEGETATION_WEIGHTS: [u32; 4] = [30, 40, 25, 5];

/// Above this elevation vegetation is bumped one class denser
const HIGHLAND_ELEVATION: f64 = 1000.0;

/// Draw a standard normal value (Box-Muller transform)
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    // random() is in [0, 1); shift u1 into (0, 1] so ln() stays finite
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn weighted_vegetation<R: Rng>(rng: &mut R) -> VegetationType {
    let total: u32 = VEGETATION_WEIGHTS.iter().sum();
    let mut pick = rng.random_range(0..total);
    for (veg, weight) in VegetationType::ALL.into_iter().zip(VEGETATION_WEIGHTS) {
        if pick < weight {
            return veg;
        }
        pick -= weight;
    }
    VegetationType::Extreme
}

/// Generate `count` plausible Australian fire-season weather conditions
///
/// - temperature U(15, 45) °C
/// - humidity U(20, 80) %, scaled by `(50 - t) / 50` so hot days are drier,
///   floored at 10 %
/// - fuel moisture `max(5, adjusted_humidity * 0.3)`
/// - wind U(5, 50) km/h towards U(0, 360)°
/// - rainfall U(0, 20) mm
///
/// Every generated condition passes [`WeatherCondition::is_valid`].
#[must_use]
pub fn generate_weather_scenarios(count: usize, seed: u64) -> Vec<WeatherCondition> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let temperature = rng.random_range(15.0..45.0);
            let humidity: f64 = rng.random_range(20.0..80.0);
            let adjusted_humidity = humidity * (50.0 - temperature) / 50.0;

            WeatherCondition {
                temperature,
                humidity: adjusted_humidity.max(10.0),
                wind_speed: rng.random_range(5.0..50.0),
                wind_direction: rng.random_range(0.0..360.0),
                rainfall: rng.random_range(0.0..20.0),
                fuel_moisture: (adjusted_humidity * 0.3).max(5.0),
            }
        })
        .collect()
}

/// Procedural ridge-and-valley terrain
///
/// Elevation is N(800, 300) m plus a ridge term `100 * sin(0.02x) * cos(0.03y)`,
/// floored at 200 m. Fuel load is U(5, 25) t/ha modulated by
/// `1 + 0.3 * sin(0.05y)`. Vegetation follows 30/40/25/5 weights and is one
/// class denser above 1000 m.
#[must_use]
pub fn synthetic_terrain(width: usize, height: usize, seed: u64) -> TerrainData {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = width * height;
    let mut elevations = Vec::with_capacity(n);
    let mut fuel_loads = Vec::with_capacity(n);
    let mut vegetation_types = Vec::with_capacity(n);

    for y in 0..height {
        for x in 0..width {
            let (xf, yf) = (x as f64, y as f64);
            let base = 800.0 + 300.0 * standard_normal(&mut rng);
            let ridge = 100.0 * (xf * 0.02).sin() * (yf * 0.03).cos();
            let elevation = (base + ridge).max(200.0);

            let moisture_effect = 1.0 + 0.3 * (yf * 0.05).sin();
            let fuel_load = rng.random_range(5.0..25.0) * moisture_effect;

            let mut vegetation = weighted_vegetation(&mut rng);
            if elevation > HIGHLAND_ELEVATION {
                vegetation = vegetation.denser();
            }

            elevations.push(elevation);
            fuel_loads.push(fuel_load);
            vegetation_types.push(vegetation);
        }
    }

    TerrainData {
        width,
        height,
        elevations,
        fuel_loads,
        vegetation_types,
    }
}

impl BushfireSimulation {
    /// Load terrain from a [`TerrainData`] bundle
    ///
    /// # Errors
    ///
    /// Same as [`initialize_terrain_from_data`](Self::initialize_terrain_from_data).
    pub fn initialize_terrain(&mut self, terrain: &TerrainData) -> Result<()> {
        self.initialize_terrain_from_data(
            &terrain.elevations,
            &terrain.fuel_loads,
            &terrain.vegetation_types,
        )
    }
}
