use bushfire_core::{VegetationType, WeatherCondition};

use crate::error::BushfireErrorCode;
use crate::helpers::{handle_ffi_result, input_slice, instance_from_ptr, with_sim_mut};
use crate::instance::BushfireInstance;

/// Weather for one timestep.
///
/// Keep this layout stable for C/C++/C# consumers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BushfireWeather {
    /// Air temperature (°C), -50 to 60.
    pub temperature: f64,

    /// Relative humidity (%), 0 to 100.
    pub humidity: f64,

    /// Wind speed (km/h), 0 to 200.
    pub wind_speed: f64,

    /// Direction the wind blows towards (degrees, 0 = +x, 90 = +y).
    pub wind_direction: f64,

    /// Rainfall (mm).
    pub rainfall: f64,

    /// Fuel moisture content (%).
    pub fuel_moisture: f64,
}

impl From<BushfireWeather> for WeatherCondition {
    fn from(weather: BushfireWeather) -> Self {
        WeatherCondition {
            temperature: weather.temperature,
            humidity: weather.humidity,
            wind_speed: weather.wind_speed,
            wind_direction: weather.wind_direction,
            rainfall: weather.rainfall,
            fuel_moisture: weather.fuel_moisture,
        }
    }
}

impl From<WeatherCondition> for BushfireWeather {
    fn from(weather: WeatherCondition) -> Self {
        Self {
            temperature: weather.temperature,
            humidity: weather.humidity,
            wind_speed: weather.wind_speed,
            wind_direction: weather.wind_direction,
            rainfall: weather.rainfall,
            fuel_moisture: weather.fuel_moisture,
        }
    }
}

/// Load terrain for every cell.
///
/// All arrays are row-major with `len` elements; `len` must equal
/// `width * height`. Vegetation codes are 0 Sparse, 1 Moderate, 2 Dense,
/// 3 Extreme. Fuel loads `<= 0` mark empty cells.
///
/// Returns
/// - `BushfireErrorCode::Ok` on success
/// - `BushfireErrorCode::NullPointer` if any pointer is null
/// - `BushfireErrorCode::InvalidTerrainParameters` if `len` does not match the grid
/// - `BushfireErrorCode::InvalidParameter` for an unknown vegetation code or non-finite value
///
/// The existing terrain is untouched on error.
///
/// # Safety
/// Each array pointer must reference at least `len` readable elements.
#[no_mangle]
pub unsafe extern "C" fn bushfire_initialize_terrain(
    ptr: *const BushfireInstance,
    elevations: *const f64,
    fuel_loads: *const f64,
    vegetation_types: *const u8,
    len: usize,
) -> BushfireErrorCode {
    handle_ffi_result(|| {
        let instance = instance_from_ptr(ptr)?;
        let elevations = unsafe { input_slice(elevations, len, "elevations")? };
        let fuel_loads = unsafe { input_slice(fuel_loads, len, "fuel_loads")? };
        let codes = unsafe { input_slice(vegetation_types, len, "vegetation_types")? };

        let vegetation = codes
            .iter()
            .map(|&code| VegetationType::try_from(code))
            .collect::<Result<Vec<_>, _>>()?;

        with_sim_mut(instance, |sim| {
            sim.initialize_terrain_from_data(elevations, fuel_loads, &vegetation)
        })??;
        Ok(())
    })
}

/// Set cell `(x, y)` burning.
///
/// Returns
/// - `BushfireErrorCode::Ok` on success
/// - `BushfireErrorCode::NullPointer` if `ptr` is null
/// - `BushfireErrorCode::OutOfBounds` outside the grid
/// - `BushfireErrorCode::NotIgnitable` for empty, burning, burnt or depleted cells
///
/// Safety:
/// - `ptr` must be a valid pointer returned by `bushfire_new`.
#[no_mangle]
pub extern "C" fn bushfire_ignite(
    ptr: *const BushfireInstance,
    x: usize,
    y: usize,
) -> BushfireErrorCode {
    handle_ffi_result(|| {
        let instance = instance_from_ptr(ptr)?;
        with_sim_mut(instance, |sim| sim.ignite(x, y))??;
        Ok(())
    })
}

/// Advance the fire by one timestep of `dt`.
///
/// Thread-safe: acquires the `RwLock` write lock for the update.
///
/// Returns
/// - `BushfireErrorCode::Ok` on success
/// - `BushfireErrorCode::InvalidWeather` for out-of-range weather
/// - `BushfireErrorCode::InvalidParameter` if `dt` is not finite and positive
///
/// The grid is unchanged on error.
///
/// Safety:
/// - `ptr` must be a valid pointer returned by `bushfire_new`.
#[no_mangle]
pub extern "C" fn bushfire_step(
    ptr: *const BushfireInstance,
    weather: BushfireWeather,
    dt: f64,
) -> BushfireErrorCode {
    bushfire_run_steps(ptr, weather, dt, 1)
}

/// Advance the fire by `steps` timesteps under constant weather.
///
/// Weather and `dt` are the same for every step, so invalid input fails on
/// the first step and leaves the grid untouched.
///
/// Safety:
/// - `ptr` must be a valid pointer returned by `bushfire_new`.
#[no_mangle]
pub extern "C" fn bushfire_run_steps(
    ptr: *const BushfireInstance,
    weather: BushfireWeather,
    dt: f64,
    steps: u32,
) -> BushfireErrorCode {
    handle_ffi_result(|| {
        let instance = instance_from_ptr(ptr)?;
        let weather = WeatherCondition::from(weather);

        with_sim_mut(instance, |sim| {
            (0..steps).try_for_each(|_| sim.simulate_timestep(&weather, dt))
        })??;
        Ok(())
    })
}
