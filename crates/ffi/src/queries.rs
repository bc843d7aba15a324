use bushfire_core::{BushfireSimulation, DangerLevel, WeatherCondition};

use crate::error::{BushfireErrorCode, DefaultBushfireError};
use crate::helpers::{copy_to_buffer, handle_ffi_result, input_slice, instance_from_ptr, with_sim};
use crate::instance::BushfireInstance;
use crate::simulation::BushfireWeather;

/// Grid coordinate of a candidate ignition cell.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BushfirePoint {
    pub x: usize,
    pub y: usize,
}

/// FFI-friendly snapshot of whole-grid fire statistics.
/// Keep this layout stable for C/C++/C# consumers.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BushfireStats {
    /// Timesteps completed.
    pub step: u64,

    pub empty_cells: usize,
    pub vegetation_cells: usize,
    pub burning_cells: usize,
    pub burnt_cells: usize,

    /// Cells whose remaining fuel fell below the burned threshold.
    pub burned_cells: usize,

    /// Burned area (hectares).
    pub burned_area_ha: f64,

    /// Highest burn intensity on the grid.
    pub max_intensity: f64,

    /// Burning cells.
    pub active_fires: usize,

    /// Burning cells with at least one non-burning in-grid neighbour.
    pub perimeter_cells: usize,
}

/// Write the grid dimensions.
///
/// # Safety
/// `out_width` and `out_height` must be valid, writable pointers.
#[no_mangle]
pub unsafe extern "C" fn bushfire_get_dimensions(
    ptr: *const BushfireInstance,
    out_width: *mut usize,
    out_height: *mut usize,
) -> BushfireErrorCode {
    handle_ffi_result(|| {
        let instance = instance_from_ptr(ptr)?;
        if out_width.is_null() {
            return Err(DefaultBushfireError::null_pointer("out_width"));
        }
        if out_height.is_null() {
            return Err(DefaultBushfireError::null_pointer("out_height"));
        }

        let (width, height) = with_sim(instance, |sim| (sim.width(), sim.height()))?;
        unsafe {
            *out_width = width;
            *out_height = height;
        }
        Ok(())
    })
}

/// Copy the row-major burn intensity grid into `out`.
///
/// Returns `BushfireErrorCode::BufferTooSmall` if `capacity < width * height`.
///
/// # Safety
/// `out` must point to at least `capacity` writable `double`s.
#[no_mangle]
pub unsafe extern "C" fn bushfire_get_burn_intensity(
    ptr: *const BushfireInstance,
    out: *mut f64,
    capacity: usize,
) -> BushfireErrorCode {
    handle_ffi_result(|| {
        let instance = instance_from_ptr(ptr)?;
        let values = with_sim(instance, BushfireSimulation::get_burn_intensity_grid)?;
        unsafe { copy_to_buffer(&values, out, capacity, "out") }
    })
}

/// Copy the row-major remaining fuel grid into `out`.
///
/// # Safety
/// `out` must point to at least `capacity` writable `double`s.
#[no_mangle]
pub unsafe extern "C" fn bushfire_get_fuel_remaining(
    ptr: *const BushfireInstance,
    out: *mut f64,
    capacity: usize,
) -> BushfireErrorCode {
    handle_ffi_result(|| {
        let instance = instance_from_ptr(ptr)?;
        let values = with_sim(instance, BushfireSimulation::get_fuel_remaining)?;
        unsafe { copy_to_buffer(&values, out, capacity, "out") }
    })
}

/// Copy the row-major burned mask into `out`.
///
/// A cell counts as burned once its remaining fuel drops below the
/// configured burned threshold.
///
/// # Safety
/// `out` must point to at least `capacity` writable `bool`s.
#[no_mangle]
pub unsafe extern "C" fn bushfire_get_burned_areas(
    ptr: *const BushfireInstance,
    out: *mut bool,
    capacity: usize,
) -> BushfireErrorCode {
    handle_ffi_result(|| {
        let instance = instance_from_ptr(ptr)?;
        let values = with_sim(instance, BushfireSimulation::get_burned_areas)?;
        unsafe { copy_to_buffer(&values, out, capacity, "out") }
    })
}

/// Copy the row-major cell state codes into `out`.
///
/// Codes: 0 Empty, 1 Vegetation, 2 Burning, 3 Burnt.
///
/// # Safety
/// `out` must point to at least `capacity` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn bushfire_get_cell_states(
    ptr: *const BushfireInstance,
    out: *mut u8,
    capacity: usize,
) -> BushfireErrorCode {
    handle_ffi_result(|| {
        let instance = instance_from_ptr(ptr)?;
        let values = with_sim(instance, BushfireSimulation::cell_states)?;
        unsafe { copy_to_buffer(&values, out, capacity, "out") }
    })
}

/// Write whole-grid statistics to `out`.
///
/// # Safety
/// `out` must be a valid, writable pointer.
#[no_mangle]
pub unsafe extern "C" fn bushfire_get_stats(
    ptr: *const BushfireInstance,
    out: *mut BushfireStats,
) -> BushfireErrorCode {
    handle_ffi_result(|| {
        let instance = instance_from_ptr(ptr)?;
        if out.is_null() {
            return Err(DefaultBushfireError::null_pointer("out"));
        }

        let stats = with_sim(instance, BushfireSimulation::statistics)?;
        unsafe {
            *out = BushfireStats {
                step: stats.step,
                empty_cells: stats.empty_cells,
                vegetation_cells: stats.vegetation_cells,
                burning_cells: stats.burning_cells,
                burnt_cells: stats.burnt_cells,
                burned_cells: stats.burned_cells,
                burned_area_ha: *stats.burned_area,
                max_intensity: stats.max_intensity,
                active_fires: stats.active_fires,
                perimeter_cells: stats.perimeter_cells,
            };
        }
        Ok(())
    })
}

/// Compute a static risk surface around candidate ignition points.
///
/// Each cell takes the highest risk contributed by any point. An empty point
/// list (`num_points == 0`, `points` may be null) yields all zeros.
///
/// Returns
/// - `BushfireErrorCode::OutOfBounds` if a point lies outside the grid
/// - `BushfireErrorCode::BufferTooSmall` if `capacity < width * height`
///
/// # Safety
/// - `points` must reference `num_points` readable elements.
/// - `out` must point to at least `capacity` writable `double`s.
#[no_mangle]
pub unsafe extern "C" fn bushfire_get_risk_surface(
    ptr: *const BushfireInstance,
    weather: BushfireWeather,
    points: *const BushfirePoint,
    num_points: usize,
    out: *mut f64,
    capacity: usize,
) -> BushfireErrorCode {
    handle_ffi_result(|| {
        let instance = instance_from_ptr(ptr)?;
        let points = unsafe { input_slice(points, num_points, "points")? };
        let points: Vec<(usize, usize)> = points.iter().map(|p| (p.x, p.y)).collect();
        let weather = WeatherCondition::from(weather);

        let risk = with_sim(instance, |sim| sim.calculate_risk_surface(&weather, &points))??;
        unsafe { copy_to_buffer(&risk, out, capacity, "out") }
    })
}

/// Estimate per-cell burn probability over `num_simulations` randomized trials.
///
/// Each trial picks one weather scenario and one ignition point at random
/// and runs an independent copy of the current grid. The instance itself is
/// not modified; only a read lock is held.
///
/// Returns
/// - `BushfireErrorCode::InvalidParameter` for empty inputs or zero trials
/// - `BushfireErrorCode::InvalidWeather` if any scenario is out of range
/// - `BushfireErrorCode::OutOfBounds` if any point lies outside the grid
///
/// # Safety
/// - `scenarios` must reference `num_scenarios` readable elements.
/// - `points` must reference `num_points` readable elements.
/// - `out` must point to at least `capacity` writable `double`s.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn bushfire_monte_carlo(
    ptr: *const BushfireInstance,
    scenarios: *const BushfireWeather,
    num_scenarios: usize,
    points: *const BushfirePoint,
    num_points: usize,
    num_simulations: usize,
    out: *mut f64,
    capacity: usize,
) -> BushfireErrorCode {
    handle_ffi_result(|| {
        let instance = instance_from_ptr(ptr)?;
        let scenarios = unsafe { input_slice(scenarios, num_scenarios, "scenarios")? };
        let points = unsafe { input_slice(points, num_points, "points")? };

        let scenarios: Vec<WeatherCondition> =
            scenarios.iter().copied().map(WeatherCondition::from).collect();
        let points: Vec<(usize, usize)> = points.iter().map(|p| (p.x, p.y)).collect();

        let probabilities = with_sim(instance, |sim| {
            sim.monte_carlo_risk_analysis(&scenarios, &points, num_simulations)
        })??;
        unsafe { copy_to_buffer(&probabilities, out, capacity, "out") }
    })
}

/// McArthur Forest Fire Danger Index for `weather`.
#[no_mangle]
pub extern "C" fn bushfire_fire_danger_index(weather: BushfireWeather) -> f64 {
    WeatherCondition::from(weather).fire_danger_index()
}

/// Fire danger rating for `weather`.
///
/// Codes: 0 Low, 1 Moderate, 2 High, 3 Very High, 4 Severe, 5 Extreme,
/// 6 Catastrophic.
#[no_mangle]
pub extern "C" fn bushfire_fire_danger_rating(weather: BushfireWeather) -> u8 {
    WeatherCondition::from(weather).fire_danger_rating() as u8
}

/// Write the preset weather for danger `level` (0 Low through 6 Catastrophic).
///
/// Returns `BushfireErrorCode::InvalidParameter` for an unknown level.
///
/// # Safety
/// `out` must be a valid, writable pointer.
#[no_mangle]
pub unsafe extern "C" fn bushfire_weather_preset(
    level: u8,
    out: *mut BushfireWeather,
) -> BushfireErrorCode {
    handle_ffi_result(|| {
        if out.is_null() {
            return Err(DefaultBushfireError::null_pointer("out"));
        }
        let level = DangerLevel::ALL
            .get(usize::from(level))
            .copied()
            .ok_or_else(|| {
                DefaultBushfireError::invalid_parameter(format!("Unknown danger level {level}"))
            })?;

        unsafe {
            *out = WeatherCondition::from_danger_level(level).into();
        }
        Ok(())
    })
}
