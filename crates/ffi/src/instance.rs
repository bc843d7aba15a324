use std::ptr;
use std::sync::RwLock;

use bushfire_core::BushfireSimulation;

use crate::error::{BushfireErrorCode, DefaultBushfireError};
use crate::helpers::track_error;

/// Opaque handle to a bushfire simulation.
///
/// # Thread Safety
/// The simulation sits behind an `RwLock`: queries take a shared read lock,
/// stepping, ignition and terrain loading take the exclusive write lock. A
/// handle may be shared between threads.
pub struct BushfireInstance {
    pub(crate) sim: RwLock<BushfireSimulation>,
}

impl BushfireInstance {
    pub(crate) fn new(
        width: usize,
        height: usize,
        seed: u64,
    ) -> Result<Box<Self>, DefaultBushfireError> {
        if width == 0 || height == 0 {
            return Err(DefaultBushfireError::invalid_parameter(format!(
                "Grid dimensions must be positive, got {width}x{height}"
            )));
        }
        if width.checked_mul(height).is_none() {
            return Err(DefaultBushfireError::invalid_parameter(format!(
                "Grid dimensions {width}x{height} overflow"
            )));
        }
        Ok(Box::new(Self {
            sim: RwLock::new(BushfireSimulation::new(width, height, seed)),
        }))
    }
}

/// Create a new simulation of `width x height` cells.
///
/// Cells start as flat moderate vegetation until `bushfire_initialize_terrain`
/// is called.
///
/// Returns
/// - `BushfireErrorCode::Ok` (0) - success, `out_instance` holds the handle
/// - `BushfireErrorCode::NullPointer` - `out_instance` is null
/// - `BushfireErrorCode::InvalidParameter` - a dimension is zero
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller owns the returned instance and MUST call `bushfire_destroy`
///   exactly once.
///
/// Example (C++)
/// ```cpp
/// BushfireInstance* sim = nullptr;
/// if (bushfire_new(200, 200, 42, &sim) != BushfireErrorCode::Ok) {
///     fprintf(stderr, "%s\n", bushfire_get_last_error());
///     return;
/// }
/// // ... use sim ...
/// bushfire_destroy(sim);
/// ```
#[no_mangle]
pub unsafe extern "C" fn bushfire_new(
    width: usize,
    height: usize,
    seed: u64,
    out_instance: *mut *mut BushfireInstance,
) -> BushfireErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultBushfireError::null_pointer("out_instance"));
    }

    match BushfireInstance::new(width, height, seed) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            BushfireErrorCode::Ok
        }
        Err(error) => {
            unsafe {
                *out_instance = ptr::null_mut();
            }
            track_error(&error)
        }
    }
}

/// Destroy a simulation created by `bushfire_new`.
///
/// A null `ptr` is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `bushfire_new` and not freed already.
/// - The caller must not use the pointer after this call.
#[no_mangle]
pub unsafe extern "C" fn bushfire_destroy(ptr: *mut BushfireInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: created by `Box::into_raw` in `bushfire_new` and not yet freed.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
