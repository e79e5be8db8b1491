//! FFI-exposed dataset types.
//!
//! Plain `#[repr(C)]` mirrors of the core datasets. Host engines fill these in
//! and pass them by value; nothing here outlives the call that receives it.

use crate::error::DefaultFfiError;
use weathering_core::core_types::{Celsius, Meters, Millimeters, Percent};
use weathering_core::{
    ClimateProfile, GeologyProfile, RockType, TerrainGrid, VegetationProfile, WeatheringError,
};

/// Caller-owned elevation samples.
///
/// `elevations` points to `width * height` values in meters, row-major
/// (`y * width + x`, rows growing southward). The data is copied on use, so
/// the caller may free it once the call returns.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Heightmap {
    /// Pointer to `width * height` elevation samples.
    pub elevations: *const f64,
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Ground distance covered by one cell in meters.
    pub cell_size: f64,
}

impl Heightmap {
    /// Copy the samples into a validated grid.
    ///
    /// # Safety
    ///
    /// `elevations` must be null or point to at least `width * height`
    /// readable `f64` values.
    pub(crate) unsafe fn to_grid(&self) -> Result<TerrainGrid, DefaultFfiError> {
        let len = match self.width.checked_mul(self.height) {
            Some(len) if len > 0 => len,
            _ => {
                return Err(DefaultFfiError::invalid_heightmap_dimensions(
                    self.width,
                    self.height,
                ))
            }
        };
        if self.elevations.is_null() {
            return Err(DefaultFfiError::null_pointer("elevations"));
        }
        // SAFETY: non-null and the caller guarantees `len` readable values
        let samples = unsafe { std::slice::from_raw_parts(self.elevations, len) };
        Ok(TerrainGrid::new(
            self.width,
            self.height,
            self.cell_size,
            samples.to_vec(),
        )?)
    }
}

/// Dominant bedrock type.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RockKind {
    /// Hardness 0.2
    Granite = 0,
    /// Hardness 0.6
    Limestone = 1,
    /// Hardness 0.8
    Sandstone = 2,
    /// Hardness 0.9
    Shale = 3,
    /// Hardness 0.5
    Other = 4,
}

impl From<RockKind> for RockType {
    fn from(kind: RockKind) -> Self {
        match kind {
            RockKind::Granite => RockType::Granite,
            RockKind::Limestone => RockType::Limestone,
            RockKind::Sandstone => RockType::Sandstone,
            RockKind::Shale => RockType::Shale,
            RockKind::Other => RockType::Other,
        }
    }
}

/// Long-term climate of the site.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateParams {
    /// Mean annual temperature in °C.
    pub temperature_c: f64,
    /// Mean annual temperature range in °C.
    pub temp_range_c: f64,
    /// Mean annual precipitation in mm.
    pub precipitation_mm: f64,
    /// Freeze-thaw cycles per year.
    pub freeze_thaw_cycles: f64,
    /// Rain/soil water pH (0-14).
    pub ph: f64,
}

impl TryFrom<ClimateParams> for ClimateProfile {
    type Error = WeatheringError;

    fn try_from(params: ClimateParams) -> Result<Self, Self::Error> {
        ClimateProfile::new(
            Celsius::new(params.temperature_c),
            params.temp_range_c,
            Millimeters::new(params.precipitation_mm),
            params.freeze_thaw_cycles,
            params.ph,
        )
    }
}

/// Bedrock type plus abundances (0-1) of the minerals with known reactivity.
///
/// Minerals with an abundance of exactly zero are left out of the
/// composition; at least one must be present.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeologyParams {
    /// Dominant rock type.
    pub rock_type: RockKind,
    /// Quartz abundance.
    pub quartz: f64,
    /// Feldspar abundance.
    pub feldspar: f64,
    /// Mica abundance.
    pub mica: f64,
    /// Calcite abundance.
    pub calcite: f64,
    /// Dolomite abundance.
    pub dolomite: f64,
}

impl TryFrom<GeologyParams> for GeologyProfile {
    type Error = WeatheringError;

    fn try_from(params: GeologyParams) -> Result<Self, Self::Error> {
        let minerals = [
            ("quartz", params.quartz),
            ("feldspar", params.feldspar),
            ("mica", params.mica),
            ("calcite", params.calcite),
            ("dolomite", params.dolomite),
        ];
        GeologyProfile::new(
            params.rock_type.into(),
            minerals.into_iter().filter(|&(_, abundance)| abundance != 0.0),
        )
    }
}

/// Vegetation cover of the site.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VegetationParams {
    /// Ground coverage in percent (0-100).
    pub coverage_percent: f64,
    /// Typical rooting depth in meters.
    pub root_depth_m: f64,
}

impl TryFrom<VegetationParams> for VegetationProfile {
    type Error = WeatheringError;

    fn try_from(params: VegetationParams) -> Result<Self, Self::Error> {
        VegetationProfile::new(
            Percent::new(params.coverage_percent),
            Meters::new(params.root_depth_m),
        )
    }
}
