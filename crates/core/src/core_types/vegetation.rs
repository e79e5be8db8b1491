//! Vegetation inputs to the biological weathering rate

use crate::core_types::units::{Meters, Percent};
use crate::error::WeatheringError;
use serde::{Deserialize, Serialize};

/// Vegetation cover of a site
///
/// Temperature suitability is not stored here: the biological rate reads the
/// temperature from the site's `ClimateProfile`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VegetationProfile {
    /// Ground coverage (0-100%)
    pub coverage: Percent,
    /// Typical rooting depth
    pub root_depth: Meters,
}

impl VegetationProfile {
    /// Create a validated vegetation profile
    ///
    /// # Errors
    ///
    /// Returns `WeatheringError::InvalidVegetation` when coverage lies outside
    /// 0-100% or root depth is negative or non-finite.
    pub fn new(coverage: Percent, root_depth: Meters) -> Result<Self, WeatheringError> {
        let profile = Self {
            coverage,
            root_depth,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check every field against its documented range
    ///
    /// # Errors
    ///
    /// See [`VegetationProfile::new`].
    pub fn validate(&self) -> Result<(), WeatheringError> {
        if !(0.0..=100.0).contains(&*self.coverage) {
            return Err(WeatheringError::InvalidVegetation {
                field: "coverage",
                value: *self.coverage,
            });
        }
        let root_depth = *self.root_depth;
        if !root_depth.is_finite() || root_depth < 0.0 {
            return Err(WeatheringError::InvalidVegetation {
                field: "root_depth",
                value: root_depth,
            });
        }
        Ok(())
    }

    /// Bare rock or ice
    pub fn barren() -> Self {
        Self {
            coverage: Percent::new(0.0),
            root_depth: Meters::new(0.0),
        }
    }

    /// Open grassland
    pub fn grassland() -> Self {
        Self {
            coverage: Percent::new(70.0),
            root_depth: Meters::new(1.5),
        }
    }

    /// Closed-canopy forest
    pub fn forest() -> Self {
        Self {
            coverage: Percent::new(90.0),
            root_depth: Meters::new(5.0),
        }
    }
}
