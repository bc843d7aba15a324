//! C ABI for the bushfire spread simulator.
//!
//! A simulation lives behind an opaque [`BushfireInstance`] created with
//! [`bushfire_new`] and released with [`bushfire_destroy`]. Every fallible call
//! returns a [`BushfireErrorCode`]; the matching message is available from
//! [`bushfire_get_last_error`] on the calling thread.
//!
//! Grid data is exchanged through caller-owned, row-major buffers. Queries
//! fail with [`BushfireErrorCode::BufferTooSmall`] rather than truncate.

mod error;
mod helpers;
mod instance;
mod queries;
mod simulation;

pub use error::{bushfire_get_last_error, bushfire_get_last_error_code, BushfireErrorCode};
pub use instance::{bushfire_destroy, bushfire_new, BushfireInstance};
pub use queries::{
    bushfire_fire_danger_index, bushfire_fire_danger_rating, bushfire_get_burn_intensity,
    bushfire_get_burned_areas, bushfire_get_cell_states, bushfire_get_dimensions,
    bushfire_get_fuel_remaining, bushfire_get_risk_surface, bushfire_get_stats,
    bushfire_monte_carlo, bushfire_weather_preset, BushfirePoint, BushfireStats,
};
pub use simulation::{
    bushfire_ignite, bushfire_initialize_terrain, bushfire_run_steps, bushfire_step,
    BushfireWeather,
};
