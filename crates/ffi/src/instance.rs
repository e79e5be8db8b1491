use std::ptr;
use std::sync::RwLock;
use weathering_core::{DatasetBundle, SessionConfig, WeatheringSession};

use crate::error::{DefaultFfiError, WeatheringErrorCode};
use crate::helpers::{clear_last_error, track_error};
use crate::profiles::{ClimateParams, GeologyParams, Heightmap, VegetationParams};

/// A weathering session bound to one site.
///
/// # Thread Safety
/// `WeatheringInstance` can be shared across host threads. The session sits
/// behind an `RwLock`:
/// - **Concurrent readers**: rate queries and projections take `.read()`
/// - **Exclusive writer**: dataset replacement takes `.write()` briefly
///
/// Projections are the expensive calls and only need the read lock, so
/// several threads can project different time steps at once.
///
/// # Usage in Game Engines
///
/// ```cpp
/// WeatheringInstance* session = nullptr;
/// Heightmap heightmap = { samples, 128, 128, 30.0 };
/// if (weathering_session_new(heightmap, climate, geology, vegetation, true, &session)
///         != WeatheringErrorCode::Ok) {
///     UE_LOG(LogTemp, Error, TEXT("%hs"), weathering_get_last_error());
///     return;
/// }
///
/// std::vector<double> snapshot(128 * 128);
/// weathering_session_project(session, 1000, snapshot.data(), snapshot.size());
///
/// weathering_session_destroy(session);
/// ```
pub struct WeatheringInstance {
    pub(crate) session: RwLock<WeatheringSession>,
}

impl WeatheringInstance {
    /// Build a session from C datasets.
    ///
    /// # Errors
    ///
    /// - `NullPointer` if the heightmap samples are null
    /// - `InvalidTerrainParameters` for empty, overflowing or non-finite terrain
    /// - `InvalidDataset` for out-of-range climate, geology or vegetation
    ///
    /// # Safety
    ///
    /// See [`Heightmap::to_grid`].
    pub(crate) unsafe fn new(
        heightmap: &Heightmap,
        climate: ClimateParams,
        geology: GeologyParams,
        vegetation: VegetationParams,
        parallel: bool,
    ) -> Result<Box<Self>, DefaultFfiError> {
        // SAFETY: forwarded from the caller
        let elevation = unsafe { heightmap.to_grid() }?;
        let datasets = DatasetBundle {
            elevation,
            geology: geology.try_into()?,
            climate: climate.try_into()?,
            vegetation: vegetation.try_into()?,
        };
        let config = SessionConfig {
            parallel,
            ..SessionConfig::default()
        };

        Ok(Box::new(Self {
            session: RwLock::new(WeatheringSession::new(datasets, config)?),
        }))
    }
}

/// Create a new weathering session and return it via out-parameter.
///
/// - Returns `WeatheringErrorCode::Ok` (0) on success with a valid instance in `out_session`
/// - Returns a non-zero error code on failure with `out_session` set to null
///
/// Parameters
/// - `heightmap`: elevation samples; copied into Rust-owned memory, so the
///   caller may free them after this call.
/// - `climate`, `geology`, `vegetation`: site datasets, validated here.
/// - `parallel`: project multi-step sets on a worker pool.
/// - `out_session`: receives the created instance. Must be non-null.
///
/// Call `weathering_get_last_error()` for a human-readable description of a
/// failure.
///
/// # Safety
///
/// - `out_session` must be a valid, non-null pointer to writable memory.
/// - `heightmap.elevations` must point to `width * height` readable values.
/// - The caller takes ownership of the returned instance and MUST call
///   `weathering_session_destroy` exactly once.
#[no_mangle]
pub unsafe extern "C" fn weathering_session_new(
    heightmap: Heightmap,
    climate: ClimateParams,
    geology: GeologyParams,
    vegetation: VegetationParams,
    parallel: bool,
    out_session: *mut *mut WeatheringInstance,
) -> WeatheringErrorCode {
    if out_session.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_session"));
    }

    // SAFETY: heightmap contract forwarded from the caller
    match unsafe { WeatheringInstance::new(&heightmap, climate, geology, vegetation, parallel) } {
        Ok(instance) => {
            // SAFETY: out_session checked non-null above
            unsafe {
                *out_session = Box::into_raw(instance);
            }
            clear_last_error();
            WeatheringErrorCode::Ok
        }
        Err(error) => {
            // SAFETY: out_session checked non-null above
            unsafe {
                *out_session = ptr::null_mut();
            }
            track_error(&error)
        }
    }
}

/// Destroy a session created by `weathering_session_new`.
///
/// Passing null is a no-op.
///
/// # Safety
///
/// `ptr` must be null or a pointer returned by `weathering_session_new` that
/// has not already been destroyed. The pointer is invalid afterwards.
#[no_mangle]
pub unsafe extern "C" fn weathering_session_destroy(ptr: *mut WeatheringInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: created by Box::into_raw in weathering_session_new
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
