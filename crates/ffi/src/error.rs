use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use weathering_core::WeatheringError;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait FfiError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> WeatheringErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `FfiError` for common FFI error scenarios.
///
/// Wraps a `WeatheringErrorCode` with a message and provides convenient
/// constructors for each failure kind (except Ok, which represents success).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFfiError {
    code: WeatheringErrorCode,
    msg: String,
}

impl DefaultFfiError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_session"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: WeatheringErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    ///
    /// # Arguments
    /// * `lock_name` - The name of the lock that was poisoned (e.g., `"RwLock"`)
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: WeatheringErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for heightmap dimensions that are zero or overflow.
    pub fn invalid_heightmap_dimensions(width: usize, height: usize) -> Self {
        Self {
            code: WeatheringErrorCode::InvalidTerrainParameters,
            msg: format!("Heightmap dimensions must be non-zero and addressable, got {width}x{height}"),
        }
    }

    /// Create error for a caller buffer that cannot hold the result.
    ///
    /// # Arguments
    /// * `param_name` - The buffer parameter (e.g., `"out_elevations"`)
    /// * `required` - Number of elements the result needs
    /// * `capacity` - Number of elements the caller provided
    pub fn buffer_too_small(param_name: &str, required: usize, capacity: usize) -> Self {
        Self {
            code: WeatheringErrorCode::BufferTooSmall,
            msg: format!("Buffer '{param_name}' holds {capacity} values, {required} required"),
        }
    }
}

impl From<WeatheringError> for DefaultFfiError {
    fn from(error: WeatheringError) -> Self {
        let code = match error {
            WeatheringError::EmptyGrid { .. }
            | WeatheringError::DimensionMismatch { .. }
            | WeatheringError::InvalidCellSize(_)
            | WeatheringError::NonFiniteElevation { .. } => {
                WeatheringErrorCode::InvalidTerrainParameters
            }
            WeatheringError::InvalidClimate { .. }
            | WeatheringError::EmptyMineralComposition
            | WeatheringError::InvalidMineralAbundance { .. }
            | WeatheringError::InvalidVegetation { .. }
            | WeatheringError::InvalidQuery { .. } => WeatheringErrorCode::InvalidDataset,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl FfiError for DefaultFfiError {
    fn code(&self) -> WeatheringErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by weathering functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatheringErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Invalid terrain: empty or overflowing dimensions, bad cell size or
    /// non-finite elevations.
    InvalidTerrainParameters = 3,

    /// Invalid climate, geology or vegetation profile.
    InvalidDataset = 4,

    /// Caller-provided output buffer is too small for the result.
    BufferTooSmall = 5,
}

impl From<DefaultFfiError> for WeatheringErrorCode {
    fn from(error: DefaultFfiError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// Allows callers to retrieve diagnostic information after a failed call.
    static LAST_ERROR: RefCell<(Option<CString>, WeatheringErrorCode)> = const { RefCell::new((None, WeatheringErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, WeatheringErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, WeatheringErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last call on this thread succeeded.
///
/// # Thread Safety
/// Error messages are stored per-thread, so each thread has its own
/// independent error state.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread that
/// sets or clears the error.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// WeatheringInstance* session = nullptr;
/// WeatheringErrorCode err = weathering_session_new(heightmap, climate, geology, vegetation, true, &session);
/// if (err != WeatheringErrorCode::Ok) {
///     const char* error = weathering_get_last_error();
///     if (error) {
///         printf("Session creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn weathering_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `WeatheringErrorCode::Ok` (0) if the last call on this thread
/// succeeded, otherwise the code of the last failed operation.
#[no_mangle]
pub extern "C" fn weathering_get_last_error_code() -> WeatheringErrorCode {
    with_last_error(|(_cstring, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_codes() {
        let err = DefaultFfiError::from(WeatheringError::InvalidCellSize(-1.0));
        assert_eq!(err.code(), WeatheringErrorCode::InvalidTerrainParameters);
        assert!(err.msg().contains("-1"));

        let err = DefaultFfiError::from(WeatheringError::EmptyMineralComposition);
        assert_eq!(WeatheringErrorCode::from(err), WeatheringErrorCode::InvalidDataset);
    }

    #[test]
    fn test_constructor_messages() {
        assert_eq!(
            DefaultFfiError::null_pointer("ptr").msg(),
            "Parameter 'ptr' cannot be null"
        );
        let err = DefaultFfiError::buffer_too_small("out", 16, 4);
        assert_eq!(err.code(), WeatheringErrorCode::BufferTooSmall);
        assert_eq!(err.msg(), "Buffer 'out' holds 4 values, 16 required");
    }
}
