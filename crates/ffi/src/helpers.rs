use std::ffi::CString;
use std::sync::{RwLockReadGuard, RwLockWriteGuard};

use bushfire_core::BushfireSimulation;

use crate::error::{with_last_error_mut, BushfireError, BushfireErrorCode, DefaultBushfireError};
use crate::instance::BushfireInstance;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl BushfireError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl BushfireError) -> BushfireErrorCode {
    set_last_error(error);
    error.code()
}

/// Run an FFI body, recording any error and converting the outcome to a code.
pub(crate) fn handle_ffi_result<F>(body: F) -> BushfireErrorCode
where
    F: FnOnce() -> Result<(), DefaultBushfireError>,
{
    match body() {
        Ok(()) => BushfireErrorCode::Ok,
        Err(error) => track_error(&error),
    }
}

/// Borrow the instance behind `ptr`, rejecting null.
pub(crate) fn instance_from_ptr<'a>(
    ptr: *const BushfireInstance,
) -> Result<&'a BushfireInstance, DefaultBushfireError> {
    if ptr.is_null() {
        return Err(DefaultBushfireError::null_pointer("ptr"));
    }
    // SAFETY: non-null and, per the API contract, created by `bushfire_new`
    // and not yet destroyed.
    Ok(unsafe { &*ptr })
}

/// Run `f` with shared access to the simulation.
pub(crate) fn with_sim<F, T>(instance: &BushfireInstance, f: F) -> Result<T, DefaultBushfireError>
where
    F: FnOnce(&BushfireSimulation) -> T,
{
    let guard: RwLockReadGuard<'_, BushfireSimulation> = instance
        .sim
        .read()
        .map_err(|_| DefaultBushfireError::lock_poisoned("RwLock"))?;
    Ok(f(&guard))
}

/// Run `f` with exclusive access to the simulation.
pub(crate) fn with_sim_mut<F, T>(
    instance: &BushfireInstance,
    f: F,
) -> Result<T, DefaultBushfireError>
where
    F: FnOnce(&mut BushfireSimulation) -> T,
{
    let mut guard: RwLockWriteGuard<'_, BushfireSimulation> = instance
        .sim
        .write()
        .map_err(|_| DefaultBushfireError::lock_poisoned("RwLock"))?;
    Ok(f(&mut guard))
}

/// View a caller-provided input array, rejecting null unless `len` is 0.
///
/// # Safety
/// `data` must point to at least `len` readable elements.
pub(crate) unsafe fn input_slice<'a, T>(
    data: *const T,
    len: usize,
    param_name: &str,
) -> Result<&'a [T], DefaultBushfireError> {
    if len == 0 {
        return Ok(&[]);
    }
    if data.is_null() {
        return Err(DefaultBushfireError::null_pointer(param_name));
    }
    Ok(unsafe { std::slice::from_raw_parts(data, len) })
}

/// Copy `values` into a caller-provided buffer of `capacity` elements.
///
/// # Safety
/// `out` must point to at least `capacity` writable elements.
pub(crate) unsafe fn copy_to_buffer<T: Copy>(
    values: &[T],
    out: *mut T,
    capacity: usize,
    param_name: &str,
) -> Result<(), DefaultBushfireError> {
    if out.is_null() {
        return Err(DefaultBushfireError::null_pointer(param_name));
    }
    if capacity < values.len() {
        return Err(DefaultBushfireError::buffer_too_small(
            param_name,
            values.len(),
            capacity,
        ));
    }
    let dest = unsafe { std::slice::from_raw_parts_mut(out, values.len()) };
    dest.copy_from_slice(values);
    Ok(())
}
