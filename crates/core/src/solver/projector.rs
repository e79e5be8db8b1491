//! Weathering projection of a terrain grid over a time horizon
//!
//! Cumulative intensity is `years * total_combined_rate`. Each cell loses
//! `intensity * slope_factor * aspect_factor * elevation_factor`, where steep
//! ground (a 45° slope doubles the loss), north-facing aspects
//! (`1 + sin(aspect) * 0.2`) and high altitude (linear increase above 500 m)
//! all weather faster. The weathered snapshot is then handed to the erosion
//! simulator.
//!
//! The base grid is cloned first and never touched.

use crate::core_types::units::{Degrees, Radians};
use crate::grid::{SlopeAspectField, TerrainGrid};
use crate::physics::WeatheringRates;
use crate::solver::erosion::ErosionSimulator;
use serde::{Deserialize, Serialize};

/// Time-step ladder for horizons up to a century
const DECADE_LADDER: [u32; 5] = [0, 10, 25, 50, 100];
/// Time-step ladder for horizons up to a millennium
const CENTURY_LADDER: [u32; 5] = [0, 100, 250, 500, 1000];
/// Time-step ladder for geological horizons
const MILLENNIUM_LADDER: [u32; 6] = [0, 1000, 5000, 10000, 50000, 100000];

/// Per-cell modulation of weathering intensity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Slope at which loss doubles (degrees)
    pub slope_reference: f64,
    /// Weight of `sin(aspect)` in the aspect factor
    pub aspect_weight: f64,
    /// Elevation above which altitude accelerates weathering (m)
    pub elevation_threshold: f64,
    /// Elevation span over which the altitude boost reaches `elevation_weight` (m)
    pub elevation_scale: f64,
    /// Altitude boost reached `elevation_scale` meters above the threshold
    pub elevation_weight: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            slope_reference: 45.0,
            aspect_weight: 0.2,
            elevation_threshold: 500.0,
            elevation_scale: 2000.0,
            elevation_weight: 0.5,
        }
    }
}

impl ProjectionConfig {
    /// `1 + slope / 45`
    #[inline]
    pub fn slope_factor(&self, slope: Degrees) -> f64 {
        1.0 + *slope / self.slope_reference
    }

    /// `1 + sin(aspect) * 0.2`
    #[inline]
    pub fn aspect_factor(&self, aspect: Radians) -> f64 {
        1.0 + aspect.sin() * self.aspect_weight
    }

    /// 1 at or below 500 m, `1 + ((z - 500) / 2000) * 0.5` above
    #[inline]
    pub fn elevation_factor(&self, elevation: f64) -> f64 {
        if elevation > self.elevation_threshold {
            1.0 + ((elevation - self.elevation_threshold) / self.elevation_scale)
                * self.elevation_weight
        } else {
            1.0
        }
    }
}

/// Produces weathered terrain snapshots from a base grid
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatheringProjector {
    config: ProjectionConfig,
    erosion: ErosionSimulator,
}

impl WeatheringProjector {
    /// Create a projector with custom modulation and erosion settings
    pub fn new(config: ProjectionConfig, erosion: ErosionSimulator) -> Self {
        Self { config, erosion }
    }

    /// Active modulation settings
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Weather a clone of `base` for `years`, then erode it
    pub fn project(&self, base: &TerrainGrid, rates: &WeatheringRates, years: u32) -> TerrainGrid {
        let mut snapshot = self.weather(base, rates, years);
        self.erosion.simulate(&mut snapshot, years);
        snapshot
    }

    /// Weather a clone of `base` for `years` without the erosion pass
    pub fn weather(&self, base: &TerrainGrid, rates: &WeatheringRates, years: u32) -> TerrainGrid {
        let mut snapshot = base.clone();
        let intensity = f64::from(years) * rates.total_combined_rate();
        let terrain = SlopeAspectField::sample(base);

        for y in 0..base.height() {
            for x in 0..base.width() {
                let cell_loss = intensity
                    * self.config.slope_factor(terrain.slope_at(x, y))
                    * self.config.aspect_factor(terrain.aspect_at(x, y))
                    * self.config.elevation_factor(base.elevation(x, y));
                snapshot.adjust_elevation(x, y, -cell_loss);
            }
        }

        snapshot
    }
}

/// Time steps (years) to project for a horizon of `max_years`
///
/// Picks a ladder by range (≤100, ≤1000, beyond) and keeps the steps that do
/// not exceed `max_years`, in ascending order.
pub fn select_time_steps(max_years: u32) -> Vec<u32> {
    let ladder: &[u32] = if max_years <= 100 {
        &DECADE_LADDER
    } else if max_years <= 1000 {
        &CENTURY_LADDER
    } else {
        &MILLENNIUM_LADDER
    };

    ladder
        .iter()
        .copied()
        .filter(|&step| step <= max_years)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::Meters;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn rates() -> WeatheringRates {
        WeatheringRates {
            physical: 0.6,
            chemical: 0.5,
            biological: 0.4,
        }
    }

    #[test]
    fn test_select_time_steps() {
        assert_eq!(select_time_steps(75), vec![0, 10, 25, 50]);
        assert_eq!(select_time_steps(100), vec![0, 10, 25, 50, 100]);
        assert_eq!(select_time_steps(0), vec![0]);
        assert_eq!(select_time_steps(101), vec![0, 100]);
        assert_eq!(select_time_steps(1000), vec![0, 100, 250, 500, 1000]);
        assert_eq!(select_time_steps(7500), vec![0, 1000, 5000]);
        assert_eq!(
            select_time_steps(u32::MAX),
            vec![0, 1000, 5000, 10000, 50000, 100000]
        );
    }

    #[test]
    fn test_modulation_factors() {
        let config = ProjectionConfig::default();
        assert_eq!(config.slope_factor(Degrees::new(0.0)), 1.0);
        assert_eq!(config.slope_factor(Degrees::new(45.0)), 2.0);
        assert_relative_eq!(config.aspect_factor(Radians::new(FRAC_PI_2)), 1.2);
        assert_relative_eq!(config.aspect_factor(Radians::new(-FRAC_PI_2)), 0.8);
        assert_eq!(config.elevation_factor(100.0), 1.0);
        assert_eq!(config.elevation_factor(500.0), 1.0);
        assert_eq!(config.elevation_factor(2500.0), 1.5);
    }

    #[test]
    fn test_flat_grid_uniform_loss() {
        let base = TerrainGrid::flat(6, 6, 30.0, Meters::new(300.0)).unwrap();
        let rates = rates();
        let snapshot = WeatheringProjector::default().weather(&base, &rates, 250);
        let intensity = 250.0 * rates.total_combined_rate();
        for &z in snapshot.elevations() {
            assert_relative_eq!(z, 300.0 - intensity, epsilon = 1e-12);
        }
        // Base untouched
        assert!(base.elevations().iter().all(|&z| z == 300.0));
    }

    #[test]
    fn test_flat_grid_high_altitude_loss() {
        let base = TerrainGrid::flat(4, 4, 30.0, Meters::new(1500.0)).unwrap();
        let rates = rates();
        let snapshot = WeatheringProjector::default().weather(&base, &rates, 100);
        let intensity = 100.0 * rates.total_combined_rate();
        for &z in snapshot.elevations() {
            assert_relative_eq!(z, 1500.0 - intensity * 1.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_years_leaves_grid_unchanged() {
        let base = TerrainGrid::single_hill(
            15,
            15,
            10.0,
            Meters::new(800.0),
            Meters::new(200.0),
            Meters::new(40.0),
        )
        .unwrap();
        let snapshot = WeatheringProjector::default().project(&base, &rates(), 0);
        assert_eq!(snapshot, base);
    }

    #[test]
    fn test_steep_cells_lose_more() {
        let base = TerrainGrid::single_hill(
            21,
            21,
            10.0,
            Meters::new(100.0),
            Meters::new(150.0),
            Meters::new(50.0),
        )
        .unwrap();
        let snapshot = WeatheringProjector::default().weather(&base, &rates(), 1000);
        let loss = |x: usize, y: usize| base.elevation(x, y) - snapshot.elevation(x, y);

        // Summit is flat; the flank is steep
        assert!(base.slope_at(10, 10).value() < 1.0);
        assert!(base.slope_at(10, 14).value() > 20.0);
        assert!(loss(10, 14) > loss(10, 10) * 2.0);
        // Every cell loses material when the combined rate is positive
        assert!((0..21).all(|x| loss(x, 5) > 0.0));
    }
}
