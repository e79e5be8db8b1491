use crate::error::{with_last_error_mut, DefaultFfiError, FfiError, WeatheringErrorCode};
use crate::instance::WeatheringInstance;
use std::ffi::CString;
use weathering_core::WeatheringSession;

/// Set the thread-local error message and code.
/// Internal helper for FFI functions to record failure details.
/// Accepts any type implementing `FfiError` trait.
pub(crate) fn set_last_error(error: &impl FfiError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
/// More efficient than handling results for immediate errors.
#[inline]
pub(crate) fn track_error(error: &impl FfiError) -> WeatheringErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Internal helper called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = WeatheringErrorCode::Ok;
    });
}

/// Run a fallible FFI body and translate its outcome into an error code.
///
/// Success clears the thread-local error; failure records it.
pub(crate) fn handle_ffi_result<F>(f: F) -> WeatheringErrorCode
where
    F: FnOnce() -> Result<(), DefaultFfiError>,
{
    match f() {
        Ok(()) => {
            clear_last_error();
            WeatheringErrorCode::Ok
        }
        Err(error) => track_error(&error),
    }
}

/// Borrow the instance behind `ptr`.
///
/// # Safety
///
/// `ptr` must be null or a pointer returned by `weathering_session_new` that
/// has not been destroyed.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const WeatheringInstance,
) -> Result<&'a WeatheringInstance, DefaultFfiError> {
    // SAFETY: caller guarantees ptr is null or a live instance
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultFfiError::null_pointer("ptr"))
}

/// Run `f` with shared access to the session.
pub(crate) fn with_session<F, R>(instance: &WeatheringInstance, f: F) -> Result<R, DefaultFfiError>
where
    F: FnOnce(&WeatheringSession) -> R,
{
    let session = instance
        .session
        .read()
        .map_err(|_| DefaultFfiError::lock_poisoned("RwLock"))?;
    Ok(f(&session))
}

/// Replace the session with the one `f` builds from it.
pub(crate) fn replace_session<F>(instance: &WeatheringInstance, f: F) -> Result<(), DefaultFfiError>
where
    F: FnOnce(&WeatheringSession) -> Result<WeatheringSession, DefaultFfiError>,
{
    let mut session = instance
        .session
        .write()
        .map_err(|_| DefaultFfiError::lock_poisoned("RwLock"))?;
    *session = f(&session)?;
    Ok(())
}
