//! Local slope and aspect from the elevation surface
//!
//! Interior cells use centred finite differences:
//!
//! ```text
//! dz/dx = (z[y][x+1] - z[y][x-1]) / (2 * cell_size)
//! dz/dy = (z[y+1][x] - z[y-1][x]) / (2 * cell_size)
//! ```
//!
//! Slope is `atan(|∇z|)` in degrees. Aspect is `atan2(-dz/dy, dz/dx)` in
//! radians: 0 = east, increasing counter-clockwise, with rows growing
//! southward. Cells on the outer ring have no centred stencil and report 0 for
//! both, with no wraparound or extrapolation.

use crate::core_types::units::{Degrees, Radians};
use crate::grid::TerrainGrid;
use nalgebra::Vector2;

/// Elevation gradient (dz/dx, dz/dy) at an interior cell, `None` on edges
#[inline]
pub fn gradient(grid: &TerrainGrid, x: usize, y: usize) -> Option<Vector2<f64>> {
    if grid.is_edge(x, y) {
        return None;
    }
    let spacing = 2.0 * grid.cell_size;
    let dz_dx = (grid.elevation(x + 1, y) - grid.elevation(x - 1, y)) / spacing;
    let dz_dy = (grid.elevation(x, y + 1) - grid.elevation(x, y - 1)) / spacing;
    Some(Vector2::new(dz_dx, dz_dy))
}

/// Slope angle at cell (x, y) in degrees (0 = flat, 90 = vertical)
#[inline]
pub fn slope_degrees(grid: &TerrainGrid, x: usize, y: usize) -> Degrees {
    gradient(grid, x, y).map_or(Degrees::new(0.0), |g| {
        Degrees::new(g.norm().atan().to_degrees())
    })
}

/// Aspect at cell (x, y) in radians (0 = east, counter-clockwise)
#[inline]
pub fn aspect_radians(grid: &TerrainGrid, x: usize, y: usize) -> Radians {
    gradient(grid, x, y).map_or(Radians::new(0.0), |g| Radians::new((-g.y).atan2(g.x)))
}

/// Slope and aspect sampled over a whole grid in one pass
///
/// Passes that mutate a grid sample it up front, so every cell in the pass
/// sees the same surface regardless of visiting order.
#[derive(Debug, Clone)]
pub struct SlopeAspectField {
    /// Slope at each cell (degrees, row-major)
    pub slope: Vec<f64>,
    /// Aspect at each cell (radians, row-major)
    pub aspect: Vec<f64>,
    /// Number of samples in X direction
    pub width: usize,
}

impl SlopeAspectField {
    /// Sample every cell of `grid`
    pub fn sample(grid: &TerrainGrid) -> Self {
        let mut slope = Vec::with_capacity(grid.len());
        let mut aspect = Vec::with_capacity(grid.len());

        for y in 0..grid.height {
            for x in 0..grid.width {
                slope.push(*slope_degrees(grid, x, y));
                aspect.push(*aspect_radians(grid, x, y));
            }
        }

        Self {
            slope,
            aspect,
            width: grid.width,
        }
    }

    /// Get sampled slope at grid position
    #[inline]
    pub fn slope_at(&self, x: usize, y: usize) -> Degrees {
        Degrees::new(self.slope[y * self.width + x])
    }

    /// Get sampled aspect at grid position
    #[inline]
    pub fn aspect_at(&self, x: usize, y: usize) -> Radians {
        Radians::new(self.aspect[y * self.width + x])
    }
}

impl TerrainGrid {
    /// Slope angle at cell (x, y); see [`slope_degrees`]
    pub fn slope_at(&self, x: usize, y: usize) -> Degrees {
        slope_degrees(self, x, y)
    }

    /// Aspect at cell (x, y); see [`aspect_radians`]
    pub fn aspect_at(&self, x: usize, y: usize) -> Radians {
        aspect_radians(self, x, y)
    }
}
