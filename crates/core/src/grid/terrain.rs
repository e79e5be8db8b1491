//! Terrain elevation grid
//!
//! A regular Digital Elevation Model: `width × height` cells of `cell_size`
//! meters, stored row-major (`y * width + x`). Grids are value objects; every
//! projection clones the grid it starts from, so the loaded dataset is never
//! mutated.

use crate::core_types::units::Meters;
use crate::error::WeatheringError;
use serde::{Deserialize, Serialize};

/// Summary statistics over every cell of a grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationStats {
    /// Lowest elevation
    pub min: Meters,
    /// Highest elevation
    pub max: Meters,
    /// Arithmetic mean elevation
    pub mean: Meters,
}

/// Terrain elevation grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainGrid {
    /// Number of cells in X direction
    pub(crate) width: usize,
    /// Number of cells in Y direction
    pub(crate) height: usize,
    /// Ground distance covered by one cell, in meters
    pub(crate) cell_size: f64,
    /// Elevation data in meters (row-major order: [y * width + x])
    pub(crate) elevations: Vec<f64>,
}

impl TerrainGrid {
    /// Create a grid from a row-major elevation buffer
    ///
    /// # Errors
    ///
    /// - `EmptyGrid` if either dimension is zero
    /// - `InvalidCellSize` if `cell_size` is not finite and positive
    /// - `DimensionMismatch` if `elevations.len() != width * height`
    /// - `NonFiniteElevation` if any sample is NaN or infinite
    pub fn new(
        width: usize,
        height: usize,
        cell_size: f64,
        elevations: Vec<f64>,
    ) -> Result<Self, WeatheringError> {
        let grid = Self {
            width,
            height,
            cell_size,
            elevations,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Create a grid from rows of elevations (y outer, x inner)
    ///
    /// # Errors
    ///
    /// Same as [`TerrainGrid::new`]; a row whose length differs from the first
    /// row is reported as a `DimensionMismatch`.
    pub fn from_rows(rows: &[Vec<f64>], cell_size: f64) -> Result<Self, WeatheringError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut elevations = Vec::with_capacity(width * height);
        for row in rows {
            if row.len() != width {
                return Err(WeatheringError::DimensionMismatch {
                    expected: width * height,
                    actual: rows.iter().map(Vec::len).sum(),
                });
            }
            elevations.extend_from_slice(row);
        }
        Self::new(width, height, cell_size, elevations)
    }

    /// Create flat terrain at a given elevation
    ///
    /// # Errors
    ///
    /// Same as [`TerrainGrid::new`].
    pub fn flat(
        width: usize,
        height: usize,
        cell_size: f64,
        elevation: Meters,
    ) -> Result<Self, WeatheringError> {
        Self::new(width, height, cell_size, vec![*elevation; width * height])
    }

    /// Create terrain with a single Gaussian hill centred on the grid
    ///
    /// `hill_radius` is in meters, as is `cell_size`.
    ///
    /// # Errors
    ///
    /// Same as [`TerrainGrid::new`].
    pub fn single_hill(
        width: usize,
        height: usize,
        cell_size: f64,
        base_elevation: Meters,
        hill_height: Meters,
        hill_radius: Meters,
    ) -> Result<Self, WeatheringError> {
        let center_x = (width as f64 - 1.0) * cell_size / 2.0;
        let center_y = (height as f64 - 1.0) * cell_size / 2.0;
        let radius_sq = *hill_radius * *hill_radius;

        let mut elevations = Vec::with_capacity(width * height);
        for iy in 0..height {
            for ix in 0..width {
                let dx = ix as f64 * cell_size - center_x;
                let dy = iy as f64 * cell_size - center_y;
                let dist_sq = dx * dx + dy * dy;

                // Gaussian hill profile
                let height_factor = if radius_sq > 0.0 {
                    (-dist_sq / radius_sq).exp()
                } else {
                    0.0
                };
                elevations.push(*base_elevation + *hill_height * height_factor);
            }
        }

        Self::new(width, height, cell_size, elevations)
    }

    /// Check the structural invariants of the grid
    ///
    /// # Errors
    ///
    /// See [`TerrainGrid::new`].
    pub fn validate(&self) -> Result<(), WeatheringError> {
        if self.width == 0 || self.height == 0 {
            return Err(WeatheringError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(WeatheringError::InvalidCellSize(self.cell_size));
        }
        let expected = self.width * self.height;
        if self.elevations.len() != expected {
            return Err(WeatheringError::DimensionMismatch {
                expected,
                actual: self.elevations.len(),
            });
        }
        if let Some(index) = self.elevations.iter().position(|z| !z.is_finite()) {
            return Err(WeatheringError::NonFiniteElevation {
                x: index % self.width,
                y: index / self.width,
            });
        }
        Ok(())
    }

    /// Row-major index of cell (x, y)
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Elevation at cell (x, y) in meters
    #[inline]
    pub fn elevation(&self, x: usize, y: usize) -> f64 {
        self.elevations[self.index(x, y)]
    }

    /// Overwrite the elevation at cell (x, y)
    #[inline]
    pub fn set_elevation(&mut self, x: usize, y: usize, value: f64) {
        let idx = self.index(x, y);
        self.elevations[idx] = value;
    }

    /// Add `delta` (meters, signed) to the elevation at cell (x, y)
    #[inline]
    pub fn adjust_elevation(&mut self, x: usize, y: usize, delta: f64) {
        let idx = self.index(x, y);
        self.elevations[idx] += delta;
    }

    /// Whether (x, y) lies on the outer ring of cells
    #[inline]
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 >= self.width || y + 1 >= self.height
    }

    /// Iterate over rows of elevations (y outer, x inner)
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.elevations.chunks_exact(self.width)
    }

    /// Flat row-major elevation buffer
    pub fn elevations(&self) -> &[f64] {
        &self.elevations
    }

    /// Minimum, maximum and mean elevation
    pub fn stats(&self) -> ElevationStats {
        let (min, max, sum) = self.elevations.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), &z| (min.min(z), max.max(z), sum + z),
        );
        ElevationStats {
            min: Meters::new(min),
            max: Meters::new(max),
            mean: Meters::new(sum / self.elevations.len() as f64),
        }
    }

    /// Get grid width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get grid height in cells
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get cell size in meters
    pub fn cell_size(&self) -> Meters {
        Meters::new(self.cell_size)
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.elevations.len()
    }

    /// True only for a grid that bypassed validation with no cells
    pub fn is_empty(&self) -> bool {
        self.elevations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_terrain() {
        let grid = TerrainGrid::flat(10, 8, 5.0, Meters::new(50.0)).unwrap();
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 8);
        assert_eq!(grid.len(), 80);
        assert_eq!(grid.elevation(3, 4), 50.0);
        let stats = grid.stats();
        assert_eq!(*stats.min, 50.0);
        assert_eq!(*stats.max, 50.0);
        assert_eq!(*stats.mean, 50.0);
    }

    #[test]
    fn test_single_hill() {
        let grid = TerrainGrid::single_hill(
            41,
            41,
            5.0,
            Meters::new(50.0),
            Meters::new(100.0),
            Meters::new(50.0),
        )
        .unwrap();

        // Peak at the centre cell
        assert_relative_eq!(grid.elevation(20, 20), 150.0, epsilon = 1e-9);
        // Corners close to base
        assert!(grid.elevation(0, 0) < 51.0);
        assert!(grid.elevation(20, 20) > grid.elevation(20, 25));
    }

    #[test]
    fn test_from_rows_row_major() {
        let grid = TerrainGrid::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]], 10.0).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.elevation(2, 0), 3.0);
        assert_eq!(grid.elevation(0, 1), 4.0);
        let rows: Vec<&[f64]> = grid.rows().collect();
        assert_eq!(rows[1], &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_jagged_rows_rejected() {
        let err = TerrainGrid::from_rows(&[vec![1.0, 2.0], vec![3.0]], 1.0).unwrap_err();
        assert_eq!(
            err,
            WeatheringError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            TerrainGrid::new(0, 3, 1.0, vec![]).unwrap_err(),
            WeatheringError::EmptyGrid { width: 0, height: 3 }
        );
        assert_eq!(
            TerrainGrid::from_rows(&[], 1.0).unwrap_err(),
            WeatheringError::EmptyGrid { width: 0, height: 0 }
        );
        assert_eq!(
            TerrainGrid::new(2, 2, 0.0, vec![0.0; 4]).unwrap_err(),
            WeatheringError::InvalidCellSize(0.0)
        );
        assert_eq!(
            TerrainGrid::new(2, 2, 1.0, vec![0.0; 3]).unwrap_err(),
            WeatheringError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        );
        assert_eq!(
            TerrainGrid::new(2, 2, 1.0, vec![0.0, 0.0, f64::NAN, 0.0]).unwrap_err(),
            WeatheringError::NonFiniteElevation { x: 0, y: 1 }
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let base = TerrainGrid::flat(3, 3, 1.0, Meters::new(10.0)).unwrap();
        let mut copy = base.clone();
        copy.adjust_elevation(1, 1, -2.5);
        assert_eq!(base.elevation(1, 1), 10.0);
        assert_eq!(copy.elevation(1, 1), 7.5);
    }

    #[test]
    fn test_edge_detection() {
        let grid = TerrainGrid::flat(4, 3, 1.0, Meters::new(0.0)).unwrap();
        assert!(grid.is_edge(0, 1));
        assert!(grid.is_edge(3, 1));
        assert!(grid.is_edge(1, 0));
        assert!(grid.is_edge(1, 2));
        assert!(!grid.is_edge(1, 1));
        assert!(!grid.is_edge(2, 1));
    }
}
