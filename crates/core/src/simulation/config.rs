//! Session configuration
//!
//! Every coefficient of the projection and erosion passes lives here with its
//! documented default, so hosts can tune or load them (all types derive serde)
//! without touching the solvers.

use crate::solver::{ErosionConfig, ErosionSimulator, ProjectionConfig, WeatheringProjector};
use serde::{Deserialize, Serialize};

/// Configuration of a [`WeatheringSession`](crate::simulation::WeatheringSession)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Per-cell weathering modulation
    pub projection: ProjectionConfig,
    /// Erosion and deposition coefficients
    pub erosion: ErosionConfig,
    /// Project independent time steps on the rayon thread pool
    pub parallel: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionConfig::default(),
            erosion: ErosionConfig::default(),
            parallel: true,
        }
    }
}

impl SessionConfig {
    /// Same coefficients, single-threaded projection
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Build the projector these settings describe
    pub fn projector(&self) -> WeatheringProjector {
        WeatheringProjector::new(self.projection, ErosionSimulator::new(self.erosion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_carry_documented_constants() {
        let config = SessionConfig::default();
        assert!(config.parallel);
        assert_eq!(config.projection.slope_reference, 45.0);
        assert_eq!(config.projection.elevation_threshold, 500.0);
        assert_eq!(config.erosion.erosion_coefficient, 0.00005);
        assert_eq!(config.erosion.deposition_coefficient, 0.00002);
        assert_eq!(config.erosion.deposition_max_slope, 10.0);
        assert!(!SessionConfig::sequential().parallel);
    }

    #[test]
    fn test_projector_uses_config() {
        let mut config = SessionConfig::default();
        config.projection.aspect_weight = 0.0;
        assert_eq!(config.projector().config().aspect_weight, 0.0);
    }
}
