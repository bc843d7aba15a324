use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use bushfire_core::SimulationError;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code passed across the FFI boundary
/// - `msg()` - Returns the error message for diagnostics
pub(crate) trait BushfireError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> BushfireErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `BushfireError` for FFI error scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultBushfireError {
    code: BushfireErrorCode,
    msg: String,
}

impl DefaultBushfireError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: BushfireErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: BushfireErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for an invalid parameter.
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: BushfireErrorCode::InvalidParameter,
            msg: message,
        }
    }

    /// Create error for an output buffer that cannot hold the result.
    ///
    /// # Arguments
    /// * `param_name` - The buffer parameter
    /// * `required` - Number of elements needed
    /// * `provided` - Number of elements the caller supplied
    pub fn buffer_too_small(param_name: &str, required: usize, provided: usize) -> Self {
        Self {
            code: BushfireErrorCode::BufferTooSmall,
            msg: format!("Buffer '{param_name}' holds {provided} elements, {required} required"),
        }
    }
}

impl BushfireError for DefaultBushfireError {
    fn code(&self) -> BushfireErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<SimulationError> for DefaultBushfireError {
    fn from(error: SimulationError) -> Self {
        let code = match error {
            SimulationError::InvalidWeather { .. } => BushfireErrorCode::InvalidWeather,
            SimulationError::SizeMismatch { .. } => BushfireErrorCode::InvalidTerrainParameters,
            SimulationError::OutOfBounds { .. } => BushfireErrorCode::OutOfBounds,
            SimulationError::NotIgnitable { .. } => BushfireErrorCode::NotIgnitable,
            SimulationError::InvalidInput(_) => BushfireErrorCode::InvalidParameter,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

/// FFI error codes returned by bushfire simulation functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BushfireErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Terrain arrays do not match the grid dimensions.
    InvalidTerrainParameters = 3,

    /// Invalid parameter passed to function.
    InvalidParameter = 4,

    /// Weather values outside the accepted ranges.
    InvalidWeather = 5,

    /// Cell coordinates outside the grid.
    OutOfBounds = 6,

    /// The cell exists but cannot be ignited.
    NotIgnitable = 7,

    /// Caller-provided output buffer is too small.
    BufferTooSmall = 8,
}

impl From<DefaultBushfireError> for BushfireErrorCode {
    fn from(error: DefaultBushfireError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    static LAST_ERROR: RefCell<(Option<CString>, BushfireErrorCode)> = const { RefCell::new((None, BushfireErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, BushfireErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, BushfireErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if no error has occurred on this thread.
///
/// # Lifetime
/// The returned pointer is valid until the next failing FFI call on this
/// thread. **DO NOT FREE THIS POINTER**.
///
/// Example:
/// ```cpp
/// BushfireErrorCode err = bushfire_ignite(sim, 5, 5);
/// if (err != BushfireErrorCode::Ok) {
///     printf("Ignition failed: %s\n", bushfire_get_last_error());
/// }
/// ```
#[no_mangle]
pub extern "C" fn bushfire_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code on this thread.
///
/// Returns `BushfireErrorCode::Ok` (0) if no error has occurred.
#[no_mangle]
pub extern "C" fn bushfire_get_last_error_code() -> BushfireErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
