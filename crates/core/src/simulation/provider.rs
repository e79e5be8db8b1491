//! Site dataset acquisition
//!
//! A session starts from four datasets fetched for one site: elevation,
//! geology, climate and vegetation. Where they come from is the host's
//! business; the engine only sees the [`DatasetProvider`] trait.
//!
//! [`SyntheticDatasetProvider`] fabricates plausible, fully deterministic
//! datasets from the query coordinates, for demos and tests that have no
//! network or GIS sources.

use crate::core_types::geology::{GeologyProfile, RockType};
use crate::core_types::units::{Celsius, Meters, Millimeters, Percent};
use crate::core_types::{ClimateProfile, VegetationProfile};
use crate::error::WeatheringError;
use crate::grid::TerrainGrid;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use tracing::info;

/// Environmental lapse rate used to cool high terrain (°C per km)
const LAPSE_RATE_PER_KM: f64 = 6.5;

/// Location and extent of a site
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteQuery {
    /// Latitude in degrees, `[-90, 90]`
    pub latitude: f64,
    /// Longitude in degrees, `[-180, 180]`
    pub longitude: f64,
    /// Radius of the area of interest in km (> 0)
    pub radius_km: f64,
}

impl SiteQuery {
    /// Create a validated query
    ///
    /// # Errors
    ///
    /// Returns `WeatheringError::InvalidQuery` naming the first out-of-range
    /// field.
    pub fn new(latitude: f64, longitude: f64, radius_km: f64) -> Result<Self, WeatheringError> {
        let query = Self {
            latitude,
            longitude,
            radius_km,
        };
        query.validate()?;
        Ok(query)
    }

    /// Check the coordinates and radius
    ///
    /// # Errors
    ///
    /// See [`SiteQuery::new`].
    pub fn validate(&self) -> Result<(), WeatheringError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(WeatheringError::InvalidQuery {
                field: "latitude",
                value: self.latitude,
            });
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(WeatheringError::InvalidQuery {
                field: "longitude",
                value: self.longitude,
            });
        }
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(WeatheringError::InvalidQuery {
                field: "radius_km",
                value: self.radius_km,
            });
        }
        Ok(())
    }
}

/// The four datasets a session is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetBundle {
    /// Digital elevation model of the site
    pub elevation: TerrainGrid,
    /// Bedrock description
    pub geology: GeologyProfile,
    /// Long-term climate
    pub climate: ClimateProfile,
    /// Vegetation cover
    pub vegetation: VegetationProfile,
}

impl DatasetBundle {
    /// Validate every dataset, elevation first
    ///
    /// # Errors
    ///
    /// Returns the first validation error of any dataset.
    pub fn validate(&self) -> Result<(), WeatheringError> {
        self.elevation.validate()?;
        self.climate.validate()?;
        self.geology.validate()?;
        self.vegetation.validate()
    }
}

/// Source of site datasets
pub trait DatasetProvider {
    /// Fetch the datasets covering `query`
    ///
    /// # Errors
    ///
    /// Implementations return `WeatheringError::InvalidQuery` for malformed
    /// queries and any dataset validation error for unusable data.
    fn fetch(&self, query: &SiteQuery) -> Result<DatasetBundle, WeatheringError>;
}

/// A fixed bundle serves every query
impl DatasetProvider for DatasetBundle {
    fn fetch(&self, query: &SiteQuery) -> Result<DatasetBundle, WeatheringError> {
        query.validate()?;
        self.validate()?;
        Ok(self.clone())
    }
}

/// Deterministic generator of plausible site datasets
///
/// The same seed and query always produce the same bundle. Latitude drives
/// temperature and precipitation bands; mean terrain height cools the site
/// by the environmental lapse rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyntheticDatasetProvider {
    /// Base seed mixed with the query
    pub seed: u64,
    /// Grid width in cells
    pub grid_width: usize,
    /// Grid height in cells
    pub grid_height: usize,
    /// Number of Gaussian hills laid over the base surface
    pub hill_count: usize,
}

impl Default for SyntheticDatasetProvider {
    fn default() -> Self {
        Self {
            seed: 42,
            grid_width: 64,
            grid_height: 64,
            hill_count: 4,
        }
    }
}

impl SyntheticDatasetProvider {
    /// Provider producing `width × height` grids
    pub fn new(seed: u64, grid_width: usize, grid_height: usize) -> Self {
        Self {
            seed,
            grid_width,
            grid_height,
            ..Self::default()
        }
    }

    fn site_seed(&self, query: &SiteQuery) -> u64 {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        query.latitude.to_bits().hash(&mut hasher);
        query.longitude.to_bits().hash(&mut hasher);
        query.radius_km.to_bits().hash(&mut hasher);
        hasher.finish()
    }

    fn synthesize_elevation(
        &self,
        rng: &mut StdRng,
        query: &SiteQuery,
    ) -> Result<TerrainGrid, WeatheringError> {
        let (width, height) = (self.grid_width, self.grid_height);
        let cell_size = query.radius_km * 2000.0 / width.max(height).max(1) as f64;
        let base = rng.random_range(50.0..1500.0);
        let relief = rng.random_range(20.0..600.0);

        // (centre x, centre y, height, radius) in normalized grid units
        let hills: Vec<(f64, f64, f64, f64)> = (0..self.hill_count)
            .map(|_| {
                (
                    rng.random_range(0.1..0.9),
                    rng.random_range(0.1..0.9),
                    relief * rng.random_range(0.3..1.0),
                    rng.random_range(0.1..0.35),
                )
            })
            .collect();

        let mut elevations = Vec::with_capacity(width * height);
        for iy in 0..height {
            for ix in 0..width {
                let u = ix as f64 / width.max(2).saturating_sub(1) as f64;
                let v = iy as f64 / height.max(2).saturating_sub(1) as f64;
                let hill_sum: f64 = hills
                    .iter()
                    .map(|&(cx, cy, h, r)| {
                        let dist_sq = (u - cx).powi(2) + (v - cy).powi(2);
                        h * (-dist_sq / (r * r)).exp()
                    })
                    .sum();
                let roughness = rng.random_range(-1.0..1.0) * relief * 0.01;
                elevations.push(base + hill_sum + roughness);
            }
        }

        TerrainGrid::new(width, height, cell_size, elevations)
    }

    fn synthesize_climate(
        rng: &mut StdRng,
        query: &SiteQuery,
        mean_elevation: f64,
    ) -> Result<ClimateProfile, WeatheringError> {
        let abs_lat = query.latitude.abs();
        let temperature = (28.0 - 0.45 * abs_lat - LAPSE_RATE_PER_KM * mean_elevation / 1000.0
            + rng.random_range(-2.0..2.0))
        .max(-60.0);
        let temp_range = 6.0 + 0.35 * abs_lat + rng.random_range(0.0..6.0);

        // Wet tropics, dry subtropics, moist mid-latitudes, dry polar
        let precipitation = if abs_lat < 15.0 {
            rng.random_range(1800.0..3000.0)
        } else if abs_lat < 35.0 {
            rng.random_range(200.0..900.0)
        } else if abs_lat < 60.0 {
            rng.random_range(600.0..1400.0)
        } else {
            rng.random_range(200.0..600.0)
        };

        let freeze_thaw_cycles = if temperature < 12.0 {
            ((12.0 - temperature) * 6.0 + temp_range * 0.5).clamp(0.0, 200.0)
                * rng.random_range(0.8..1.2)
        } else {
            rng.random_range(0.0..3.0)
        };

        ClimateProfile::new(
            Celsius::new(temperature),
            temp_range,
            Millimeters::new(precipitation),
            freeze_thaw_cycles,
            rng.random_range(4.5..8.5),
        )
    }

    fn synthesize_geology(rng: &mut StdRng) -> Result<GeologyProfile, WeatheringError> {
        let preset = match rng.random_range(0..4) {
            0 => GeologyProfile::granite(),
            1 => GeologyProfile::limestone(),
            2 => GeologyProfile::sandstone(),
            _ => GeologyProfile::shale(),
        };
        let rock_type: RockType = preset.rock_type;

        let mut minerals: Vec<(String, f64)> = preset.mineral_composition.into_iter().collect();
        // Map iteration order is unspecified; sort before drawing jitter
        minerals.sort_by(|a, b| a.0.cmp(&b.0));
        let jittered = minerals.into_iter().map(|(name, abundance)| {
            let abundance = (abundance * rng.random_range(0.9..1.1)).clamp(0.0, 1.0);
            (name, abundance)
        });
        GeologyProfile::new(rock_type, jittered.collect::<Vec<_>>())
    }

    fn synthesize_vegetation(
        rng: &mut StdRng,
        climate: &ClimateProfile,
    ) -> Result<VegetationProfile, WeatheringError> {
        let cold_penalty = if *climate.temperature < -5.0 { 0.1 } else { 1.0 };
        let coverage = ((*climate.precipitation / 15.0).min(95.0) * cold_penalty).clamp(0.0, 100.0);
        let root_depth = coverage / 100.0 * rng.random_range(0.5..6.0);
        VegetationProfile::new(Percent::new(coverage), Meters::new(root_depth))
    }
}

impl DatasetProvider for SyntheticDatasetProvider {
    fn fetch(&self, query: &SiteQuery) -> Result<DatasetBundle, WeatheringError> {
        query.validate()?;
        let mut rng = StdRng::seed_from_u64(self.site_seed(query));

        let elevation = self.synthesize_elevation(&mut rng, query)?;
        let mean_elevation = *elevation.stats().mean;
        let climate = Self::synthesize_climate(&mut rng, query, mean_elevation)?;
        let geology = Self::synthesize_geology(&mut rng)?;
        let vegetation = Self::synthesize_vegetation(&mut rng, &climate)?;

        info!(
            latitude = query.latitude,
            longitude = query.longitude,
            radius_km = query.radius_km,
            "Synthesized {}x{} site: {} bedrock, {:.1} °C, {:.0} mm/yr",
            elevation.width(),
            elevation.height(),
            geology.rock_type,
            *climate.temperature,
            *climate.precipitation
        );

        Ok(DatasetBundle {
            elevation,
            geology,
            climate,
            vegetation,
        })
    }
}
