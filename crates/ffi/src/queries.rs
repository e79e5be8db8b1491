use weathering_core::{select_time_steps, ClimateProfile, GeologyProfile, VegetationProfile};

use crate::error::{DefaultFfiError, WeatheringErrorCode};
use crate::helpers::{handle_ffi_result, instance_from_ptr, replace_session, with_session};
use crate::instance::WeatheringInstance;
use crate::profiles::{ClimateParams, GeologyParams, VegetationParams};

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// FFI-friendly snapshot of the session's weathering rates.
/// Keep this layout stable for C/C++/C# consumers.
pub struct RatesSnapshot {
    /// Physical weathering rate (dimensionless).
    pub physical: f64,
    /// Chemical weathering rate (dimensionless).
    pub chemical: f64,
    /// Biological weathering rate (dimensionless, may be negative).
    pub biological: f64,
    /// Elevation loss per year in meters before terrain modulation.
    pub total_combined: f64,
}

/// Write the session's current rates into `out_rates`.
///
/// # Safety
///
/// `ptr` must be null or a live instance; `out_rates` must be null or
/// writable.
#[no_mangle]
pub unsafe extern "C" fn weathering_session_get_rates(
    ptr: *const WeatheringInstance,
    out_rates: *mut RatesSnapshot,
) -> WeatheringErrorCode {
    handle_ffi_result(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        // SAFETY: caller contract
        let out = unsafe { out_rates.as_mut() }
            .ok_or_else(|| DefaultFfiError::null_pointer("out_rates"))?;

        let rates = with_session(instance, |session| session.rates())?;
        *out = RatesSnapshot {
            physical: rates.physical,
            chemical: rates.chemical,
            biological: rates.biological,
            total_combined: rates.total_combined_rate(),
        };
        Ok(())
    })
}

/// Write the grid dimensions (cells) into `out_width` and `out_height`.
///
/// # Safety
///
/// `ptr` must be null or a live instance; both out-pointers must be null or
/// writable.
#[no_mangle]
pub unsafe extern "C" fn weathering_session_get_dimensions(
    ptr: *const WeatheringInstance,
    out_width: *mut usize,
    out_height: *mut usize,
) -> WeatheringErrorCode {
    handle_ffi_result(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        // SAFETY: caller contract
        let width = unsafe { out_width.as_mut() }
            .ok_or_else(|| DefaultFfiError::null_pointer("out_width"))?;
        // SAFETY: caller contract
        let height = unsafe { out_height.as_mut() }
            .ok_or_else(|| DefaultFfiError::null_pointer("out_height"))?;

        let (w, h) = with_session(instance, |session| {
            (session.base_grid().width(), session.base_grid().height())
        })?;
        *width = w;
        *height = h;
        Ok(())
    })
}

/// Select the time steps (years) to project for a horizon of `max_years`.
///
/// The number of steps is always written to `out_len`. Pass a null
/// `out_steps` (or a short buffer) to query the size first; that call returns
/// `BufferTooSmall` without writing any steps.
///
/// # Safety
///
/// `out_len` must be null or writable; `out_steps` must be null or point to
/// `capacity` writable values.
#[no_mangle]
pub unsafe extern "C" fn weathering_select_time_steps(
    max_years: u32,
    out_steps: *mut u32,
    capacity: usize,
    out_len: *mut usize,
) -> WeatheringErrorCode {
    handle_ffi_result(|| {
        // SAFETY: caller contract
        let len = unsafe { out_len.as_mut() }
            .ok_or_else(|| DefaultFfiError::null_pointer("out_len"))?;

        let steps = select_time_steps(max_years);
        *len = steps.len();
        if out_steps.is_null() || capacity < steps.len() {
            return Err(DefaultFfiError::buffer_too_small(
                "out_steps",
                steps.len(),
                capacity,
            ));
        }

        // SAFETY: non-null and the caller guarantees `capacity` values
        let out = unsafe { std::slice::from_raw_parts_mut(out_steps, capacity) };
        out[..steps.len()].copy_from_slice(&steps);
        Ok(())
    })
}

/// Project the base grid forward `years` and write the elevations, row-major,
/// into `out_elevations`.
///
/// The buffer must hold at least `width * height` values (see
/// `weathering_session_get_dimensions`).
///
/// Thread-safe: takes the read lock only, so concurrent projections proceed in
/// parallel.
///
/// # Safety
///
/// `ptr` must be null or a live instance; `out_elevations` must be null or
/// point to `capacity` writable values.
#[no_mangle]
pub unsafe extern "C" fn weathering_session_project(
    ptr: *const WeatheringInstance,
    years: u32,
    out_elevations: *mut f64,
    capacity: usize,
) -> WeatheringErrorCode {
    handle_ffi_result(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        if out_elevations.is_null() {
            return Err(DefaultFfiError::null_pointer("out_elevations"));
        }

        with_session(instance, |session| {
            let required = session.base_grid().len();
            if capacity < required {
                return Err(DefaultFfiError::buffer_too_small(
                    "out_elevations",
                    required,
                    capacity,
                ));
            }
            let snapshot = session.project(years);
            // SAFETY: non-null and the caller guarantees `capacity` values
            let out = unsafe { std::slice::from_raw_parts_mut(out_elevations, capacity) };
            out[..required].copy_from_slice(snapshot.elevations());
            Ok(())
        })?
    })
}

/// Replace the site climate. On failure the session is left unchanged.
///
/// # Safety
///
/// `ptr` must be null or a live instance.
#[no_mangle]
pub unsafe extern "C" fn weathering_session_set_climate(
    ptr: *const WeatheringInstance,
    climate: ClimateParams,
) -> WeatheringErrorCode {
    handle_ffi_result(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let climate = ClimateProfile::try_from(climate)?;
        replace_session(instance, |session| {
            session.with_climate(climate).map_err(DefaultFfiError::from)
        })
    })
}

/// Replace the site geology. On failure the session is left unchanged.
///
/// # Safety
///
/// `ptr` must be null or a live instance.
#[no_mangle]
pub unsafe extern "C" fn weathering_session_set_geology(
    ptr: *const WeatheringInstance,
    geology: GeologyParams,
) -> WeatheringErrorCode {
    handle_ffi_result(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let geology = GeologyProfile::try_from(geology)?;
        replace_session(instance, |session| {
            session.with_geology(geology).map_err(DefaultFfiError::from)
        })
    })
}

/// Replace the site vegetation. On failure the session is left unchanged.
///
/// # Safety
///
/// `ptr` must be null or a live instance.
#[no_mangle]
pub unsafe extern "C" fn weathering_session_set_vegetation(
    ptr: *const WeatheringInstance,
    vegetation: VegetationParams,
) -> WeatheringErrorCode {
    handle_ffi_result(|| {
        // SAFETY: caller contract
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let vegetation = VegetationProfile::try_from(vegetation)?;
        replace_session(instance, |session| {
            session.with_vegetation(vegetation).map_err(DefaultFfiError::from)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::weathering_get_last_error_code;
    use crate::instance::{weathering_session_destroy, weathering_session_new};
    use crate::profiles::{Heightmap, RockKind};
    use std::ptr;

    const WIDTH: usize = 6;
    const HEIGHT: usize = 5;

    fn climate() -> ClimateParams {
        ClimateParams {
            temperature_c: 12.0,
            temp_range_c: 18.0,
            precipitation_mm: 900.0,
            freeze_thaw_cycles: 40.0,
            ph: 6.2,
        }
    }

    fn geology() -> GeologyParams {
        GeologyParams {
            rock_type: RockKind::Granite,
            quartz: 0.3,
            feldspar: 0.6,
            mica: 0.1,
            calcite: 0.0,
            dolomite: 0.0,
        }
    }

    fn vegetation() -> VegetationParams {
        VegetationParams {
            coverage_percent: 70.0,
            root_depth_m: 1.5,
        }
    }

    fn new_session(samples: &[f64]) -> *mut WeatheringInstance {
        let heightmap = Heightmap {
            elevations: samples.as_ptr(),
            width: WIDTH,
            height: HEIGHT,
            cell_size: 20.0,
        };
        let mut session = ptr::null_mut();
        let code = unsafe {
            weathering_session_new(heightmap, climate(), geology(), vegetation(), false, &mut session)
        };
        assert_eq!(code, WeatheringErrorCode::Ok);
        session
    }

    fn samples() -> Vec<f64> {
        (0..WIDTH * HEIGHT).map(|i| 300.0 + (i % WIDTH) as f64 * 4.0).collect()
    }

    #[test]
    fn test_session_round_trip() {
        let samples = samples();
        let session = new_session(&samples);

        let mut rates = RatesSnapshot::default();
        let code = unsafe { weathering_session_get_rates(session, &mut rates) };
        assert_eq!(code, WeatheringErrorCode::Ok);
        assert!(rates.total_combined > 0.0);

        let (mut w, mut h) = (0, 0);
        assert_eq!(
            unsafe { weathering_session_get_dimensions(session, &mut w, &mut h) },
            WeatheringErrorCode::Ok
        );
        assert_eq!((w, h), (WIDTH, HEIGHT));

        let mut unchanged = vec![0.0; WIDTH * HEIGHT];
        let code = unsafe {
            weathering_session_project(session, 0, unchanged.as_mut_ptr(), unchanged.len())
        };
        assert_eq!(code, WeatheringErrorCode::Ok);
        assert_eq!(unchanged, samples);

        let mut projected = vec![0.0; WIDTH * HEIGHT];
        unsafe {
            weathering_session_project(session, 500, projected.as_mut_ptr(), projected.len());
        }
        assert!(projected.iter().sum::<f64>() < samples.iter().sum::<f64>());

        unsafe { weathering_session_destroy(session) };
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let samples = samples();
        let session = new_session(&samples);
        let mut short = vec![0.0; 3];
        let code =
            unsafe { weathering_session_project(session, 10, short.as_mut_ptr(), short.len()) };
        assert_eq!(code, WeatheringErrorCode::BufferTooSmall);
        assert_eq!(weathering_get_last_error_code(), WeatheringErrorCode::BufferTooSmall);
        unsafe { weathering_session_destroy(session) };
    }

    #[test]
    fn test_time_steps_size_query() {
        let mut len = 0;
        let code = unsafe { weathering_select_time_steps(75, ptr::null_mut(), 0, &mut len) };
        assert_eq!(code, WeatheringErrorCode::BufferTooSmall);
        assert_eq!(len, 4);

        let mut steps = vec![0_u32; len];
        let code =
            unsafe { weathering_select_time_steps(75, steps.as_mut_ptr(), steps.len(), &mut len) };
        assert_eq!(code, WeatheringErrorCode::Ok);
        assert_eq!(steps, vec![0, 10, 25, 50]);
    }

    #[test]
    fn test_invalid_replacement_keeps_session() {
        let samples = samples();
        let session = new_session(&samples);
        let mut before = RatesSnapshot::default();
        unsafe { weathering_session_get_rates(session, &mut before) };

        let acid = ClimateParams {
            ph: 20.0,
            ..climate()
        };
        let code = unsafe { weathering_session_set_climate(session, acid) };
        assert_eq!(code, WeatheringErrorCode::InvalidDataset);

        let mut after = RatesSnapshot::default();
        unsafe { weathering_session_get_rates(session, &mut after) };
        assert_eq!(before, after);

        let bare = VegetationParams {
            coverage_percent: 0.0,
            root_depth_m: 0.0,
        };
        assert_eq!(
            unsafe { weathering_session_set_vegetation(session, bare) },
            WeatheringErrorCode::Ok
        );
        unsafe { weathering_session_get_rates(session, &mut after) };
        assert!(after.biological < before.biological);

        unsafe { weathering_session_destroy(session) };
    }

    #[test]
    fn test_null_arguments() {
        let mut session = ptr::null_mut();
        let heightmap = Heightmap {
            elevations: ptr::null(),
            width: WIDTH,
            height: HEIGHT,
            cell_size: 20.0,
        };
        let code = unsafe {
            weathering_session_new(heightmap, climate(), geology(), vegetation(), true, &mut session)
        };
        assert_eq!(code, WeatheringErrorCode::NullPointer);
        assert!(session.is_null());

        let mut rates = RatesSnapshot::default();
        assert_eq!(
            unsafe { weathering_session_get_rates(ptr::null(), &mut rates) },
            WeatheringErrorCode::NullPointer
        );
    }
}
