//! Water-driven erosion and deposition over a terrain grid.
//!
//! Runs after weathering on a grid the caller exclusively owns and mutates it
//! in place. Flow is routed once from the surface as it stands on entry; two
//! passes follow:
//!
//! 1. **Erosion** strips material where slope and flow are high:
//!    `rate * sqrt(accumulation) * slope / 45`, never raising a cell.
//! 2. **Deposition** lays material down on gentle ground (slope below 10°):
//!    `max(0, rate * sqrt(accumulation) * (1 - slope / 90))`, never lowering a
//!    cell.
//!
//! Each pass samples slope from the surface as it stands when that pass
//! begins. Erosion has no floor and may drive elevations negative.

use crate::grid::{SlopeAspectField, TerrainGrid};
use crate::solver::flow::FlowField;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Coefficients of the erosion/deposition passes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErosionConfig {
    /// Erosion per year per unit flow at the reference slope (m)
    pub erosion_coefficient: f64,
    /// Deposition per year per unit flow on flat ground (m)
    pub deposition_coefficient: f64,
    /// Slope at which erosion reaches one full rate unit (degrees)
    pub erosion_reference_slope: f64,
    /// Slope at which deposition falls to zero (degrees)
    pub deposition_reference_slope: f64,
    /// Deposition only occurs on slopes strictly below this (degrees)
    pub deposition_max_slope: f64,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            erosion_coefficient: 0.00005,
            deposition_coefficient: 0.00002,
            erosion_reference_slope: 45.0,
            deposition_reference_slope: 90.0,
            deposition_max_slope: 10.0,
        }
    }
}

/// In-place erosion/deposition simulator
#[derive(Debug, Clone, Copy, Default)]
pub struct ErosionSimulator {
    config: ErosionConfig,
}

impl ErosionSimulator {
    /// Create a simulator with custom coefficients
    pub fn new(config: ErosionConfig) -> Self {
        Self { config }
    }

    /// Active coefficients
    pub fn config(&self) -> &ErosionConfig {
        &self.config
    }

    /// Apply `years` of erosion then deposition to `grid`
    pub fn simulate(&self, grid: &mut TerrainGrid, years: u32) {
        let years = f64::from(years);
        let flow = FlowField::compute(grid);

        let eroded = self.erosion_pass(grid, &flow, years);
        let deposited = self.deposition_pass(grid, &flow, years);

        debug!(
            years,
            eroded_m = eroded,
            deposited_m = deposited,
            "Erosion pass complete ({}x{} grid)",
            grid.width(),
            grid.height()
        );
    }

    /// Subtract erosion from every cell; returns total material removed (m)
    fn erosion_pass(&self, grid: &mut TerrainGrid, flow: &FlowField, years: f64) -> f64 {
        let erosion_rate = self.config.erosion_coefficient * years;
        let slopes = SlopeAspectField::sample(grid);
        let mut total = 0.0;

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let slope = *slopes.slope_at(x, y);
                let amount = erosion_rate
                    * flow.accumulation_at(x, y).sqrt()
                    * (slope / self.config.erosion_reference_slope);
                grid.adjust_elevation(x, y, -amount);
                total += amount;
            }
        }

        total
    }

    /// Add deposition on gentle slopes; returns total material added (m)
    fn deposition_pass(&self, grid: &mut TerrainGrid, flow: &FlowField, years: f64) -> f64 {
        let deposition_rate = self.config.deposition_coefficient * years;
        let slopes = SlopeAspectField::sample(grid);
        let mut total = 0.0;

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let slope = *slopes.slope_at(x, y);
                if slope >= self.config.deposition_max_slope {
                    continue;
                }
                let amount = deposition_rate
                    * flow.accumulation_at(x, y).sqrt()
                    * (1.0 - slope / self.config.deposition_reference_slope);
                let amount = amount.max(0.0);
                grid.adjust_elevation(x, y, amount);
                total += amount;
            }
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::Meters;
    use approx::assert_relative_eq;

    fn hill() -> TerrainGrid {
        TerrainGrid::single_hill(
            21,
            21,
            10.0,
            Meters::new(200.0),
            Meters::new(120.0),
            Meters::new(60.0),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_years_is_identity() {
        let base = hill();
        let mut grid = base.clone();
        ErosionSimulator::default().simulate(&mut grid, 0);
        assert_eq!(grid, base);
    }

    #[test]
    fn test_flat_grid_only_deposits() {
        let mut grid = TerrainGrid::flat(5, 5, 10.0, Meters::new(100.0)).unwrap();
        ErosionSimulator::default().simulate(&mut grid, 1000);
        // slope 0, accumulation 1: deposition = 0.00002 * 1000 * 1 * 1
        for y in 0..5 {
            for x in 0..5 {
                assert_relative_eq!(grid.elevation(x, y), 100.02, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_erosion_pass_never_raises() {
        let base = hill();
        let mut grid = base.clone();
        let sim = ErosionSimulator::default();
        let flow = FlowField::compute(&grid);
        sim.erosion_pass(&mut grid, &flow, 500.0);
        for (after, before) in grid.elevations().iter().zip(base.elevations()) {
            assert!(after <= before);
        }
        assert!(grid.elevations().iter().zip(base.elevations()).any(|(a, b)| a < b));
    }

    #[test]
    fn test_deposition_pass_never_lowers() {
        let base = hill();
        let mut grid = base.clone();
        let sim = ErosionSimulator::default();
        let flow = FlowField::compute(&grid);
        sim.deposition_pass(&mut grid, &flow, 500.0);
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let (after, before) = (grid.elevation(x, y), base.elevation(x, y));
                assert!(after >= before);
                if base.slope_at(x, y).value() >= 10.0 {
                    assert_eq!(after, before);
                }
            }
        }
    }

    #[test]
    fn test_erosion_matches_formula_on_ramp() {
        // 45° ramp eastward; interior cell (2, 2)
        let mut elevations = Vec::new();
        for _y in 0..5 {
            for x in 0..5 {
                elevations.push(1000.0 + x as f64 * 10.0);
            }
        }
        let base = TerrainGrid::new(5, 5, 10.0, elevations).unwrap();
        let mut grid = base.clone();
        let sim = ErosionSimulator::default();
        let flow = FlowField::compute(&grid);
        sim.erosion_pass(&mut grid, &flow, 100.0);

        let acc = flow.accumulation_at(2, 2);
        let expected = 0.00005 * 100.0 * acc.sqrt() * 1.0;
        assert_relative_eq!(
            base.elevation(2, 2) - grid.elevation(2, 2),
            expected,
            epsilon = 1e-9
        );
        // Edge cells have zero slope and are not eroded
        assert_eq!(grid.elevation(0, 2), base.elevation(0, 2));
    }

    #[test]
    fn test_custom_config() {
        let config = ErosionConfig {
            deposition_coefficient: 0.0,
            ..Default::default()
        };
        let mut grid = TerrainGrid::flat(3, 3, 1.0, Meters::new(5.0)).unwrap();
        ErosionSimulator::new(config).simulate(&mut grid, 100);
        assert!(grid.elevations().iter().all(|&z| z == 5.0));
    }
}
