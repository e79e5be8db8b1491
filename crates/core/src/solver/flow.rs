//! Steepest-descent flow routing (D8) and flow accumulation
//!
//! Each cell drains toward its lowest of 8 neighbours, provided that neighbour
//! is strictly lower. Cells with no lower neighbour are sinks. Equal lowest
//! neighbours are resolved by the fixed octant order of [`FlowDirection::ALL`]
//! (east first, then counter-clockwise), so routing is fully deterministic.
//!
//! Accumulation visits cells from highest to lowest elevation. Every cell
//! starts with a weight of 1 and passes its running total to its downstream
//! neighbour, which is always visited later because it is strictly lower.

use crate::grid::TerrainGrid;
use serde::{Deserialize, Serialize};

/// One of the eight compass octants a cell can drain toward
///
/// Rows grow southward, so north is `dy = -1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowDirection {
    /// +x
    East,
    /// +x, -y
    NorthEast,
    /// -y
    North,
    /// -x, -y
    NorthWest,
    /// -x
    West,
    /// -x, +y
    SouthWest,
    /// +y
    South,
    /// +x, +y
    SouthEast,
}

impl FlowDirection {
    /// All octants in tie-break priority order
    pub const ALL: [FlowDirection; 8] = [
        Self::East,
        Self::NorthEast,
        Self::North,
        Self::NorthWest,
        Self::West,
        Self::SouthWest,
        Self::South,
        Self::SouthEast,
    ];

    /// Cell offset (dx, dy) for this direction
    #[must_use]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::East => (1, 0),
            Self::NorthEast => (1, -1),
            Self::North => (0, -1),
            Self::NorthWest => (-1, -1),
            Self::West => (-1, 0),
            Self::SouthWest => (-1, 1),
            Self::South => (0, 1),
            Self::SouthEast => (1, 1),
        }
    }

    /// Neighbouring cell in this direction, `None` if it falls off the grid
    #[must_use]
    pub fn neighbor(self, x: usize, y: usize, width: usize, height: usize) -> Option<(usize, usize)> {
        let (dx, dy) = self.offset();
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < width && ny < height).then_some((nx, ny))
    }
}

/// Per-cell drainage directions and contributing area
///
/// Ephemeral: rebuilt from the current surface at the start of every erosion
/// pass and dropped afterwards.
#[derive(Debug, Clone)]
pub struct FlowField {
    /// Drainage direction per cell (row-major), `None` for sinks
    pub directions: Vec<Option<FlowDirection>>,
    /// Number of cells draining through each cell, itself included
    pub accumulation: Vec<f64>,
    /// Number of cells in X direction
    pub width: usize,
    /// Number of cells in Y direction
    pub height: usize,
}

impl FlowField {
    /// Route flow over `grid` and accumulate contributing area
    pub fn compute(grid: &TerrainGrid) -> Self {
        let directions = compute_flow_directions(grid);
        let accumulation = compute_flow_accumulation(grid, &directions);
        Self {
            directions,
            accumulation,
            width: grid.width(),
            height: grid.height(),
        }
    }

    /// Drainage direction at cell (x, y)
    #[inline]
    pub fn direction_at(&self, x: usize, y: usize) -> Option<FlowDirection> {
        self.directions[y * self.width + x]
    }

    /// Contributing area at cell (x, y), in cells
    #[inline]
    pub fn accumulation_at(&self, x: usize, y: usize) -> f64 {
        self.accumulation[y * self.width + x]
    }

    /// Downstream cell of (x, y), `None` for sinks
    pub fn downstream(&self, x: usize, y: usize) -> Option<(usize, usize)> {
        self.direction_at(x, y)
            .and_then(|dir| dir.neighbor(x, y, self.width, self.height))
    }
}

/// Steepest-descent direction for every cell
pub fn compute_flow_directions(grid: &TerrainGrid) -> Vec<Option<FlowDirection>> {
    let (width, height) = (grid.width(), grid.height());
    let mut directions = Vec::with_capacity(grid.len());

    for y in 0..height {
        for x in 0..width {
            let mut best: Option<FlowDirection> = None;
            let mut best_h = grid.elevation(x, y);

            for dir in FlowDirection::ALL {
                let Some((nx, ny)) = dir.neighbor(x, y, width, height) else {
                    continue;
                };
                let hn = grid.elevation(nx, ny);
                // Strictly lower only: earlier octants win ties
                if hn < best_h {
                    best_h = hn;
                    best = Some(dir);
                }
            }

            directions.push(best);
        }
    }

    directions
}

/// Contributing area per cell given drainage directions
pub fn compute_flow_accumulation(
    grid: &TerrainGrid,
    directions: &[Option<FlowDirection>],
) -> Vec<f64> {
    let (width, height) = (grid.width(), grid.height());
    let elevations = grid.elevations();
    debug_assert_eq!(directions.len(), elevations.len());

    // Highest first so upstream totals are complete before they move on
    let mut order: Vec<usize> = (0..elevations.len()).collect();
    order.sort_by(|&a, &b| elevations[b].total_cmp(&elevations[a]).then(a.cmp(&b)));

    let mut accum = vec![1.0; elevations.len()];

    for idx in order {
        let Some(dir) = directions[idx] else {
            continue;
        };
        if let Some((nx, ny)) = dir.neighbor(idx % width, idx / width, width, height) {
            accum[ny * width + nx] += accum[idx];
        }
    }

    accum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::Meters;

    #[test]
    fn test_flat_grid_is_all_sinks() {
        let grid = TerrainGrid::flat(4, 4, 1.0, Meters::new(10.0)).unwrap();
        let field = FlowField::compute(&grid);
        assert!(field.directions.iter().all(Option::is_none));
        assert!(field.accumulation.iter().all(|&a| a == 1.0));
    }

    #[test]
    fn test_lowest_neighbour_wins() {
        let grid = TerrainGrid::from_rows(
            &[
                vec![9.0, 9.0, 9.0],
                vec![9.0, 5.0, 9.0],
                vec![9.0, 9.0, 1.0],
            ],
            1.0,
        )
        .unwrap();
        let field = FlowField::compute(&grid);
        assert_eq!(field.direction_at(1, 1), Some(FlowDirection::SouthEast));
        assert_eq!(field.direction_at(2, 2), None);
        assert_eq!(field.downstream(1, 1), Some((2, 2)));
    }

    #[test]
    fn test_ties_follow_octant_priority() {
        // East and North both lowest: East comes first
        let grid = TerrainGrid::from_rows(
            &[
                vec![5.0, 1.0, 5.0],
                vec![5.0, 5.0, 1.0],
                vec![5.0, 5.0, 5.0],
            ],
            1.0,
        )
        .unwrap();
        assert_eq!(
            FlowField::compute(&grid).direction_at(1, 1),
            Some(FlowDirection::East)
        );

        // North and West tie: North precedes West
        let grid = TerrainGrid::from_rows(
            &[
                vec![5.0, 2.0, 5.0],
                vec![2.0, 5.0, 5.0],
                vec![5.0, 5.0, 5.0],
            ],
            1.0,
        )
        .unwrap();
        assert_eq!(
            FlowField::compute(&grid).direction_at(1, 1),
            Some(FlowDirection::North)
        );
    }

    #[test]
    fn test_accumulation_along_a_ramp() {
        // Single row sloping east: every cell drains east into the last
        let grid = TerrainGrid::from_rows(&[vec![4.0, 3.0, 2.0, 1.0, 0.0]], 1.0).unwrap();
        let field = FlowField::compute(&grid);
        assert_eq!(field.accumulation, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(field.direction_at(4, 0), None);
    }

    #[test]
    fn test_accumulation_conserves_cells() {
        // Bowl: everything ends in the centre sink
        let grid = TerrainGrid::from_rows(
            &[
                vec![5.0, 4.0, 5.0],
                vec![4.0, 0.0, 4.0],
                vec![5.0, 4.0, 5.0],
            ],
            1.0,
        )
        .unwrap();
        let field = FlowField::compute(&grid);
        assert_eq!(field.accumulation_at(1, 1), 9.0);
        let sinks: f64 = (0..9)
            .filter(|&i| field.directions[i].is_none())
            .map(|i| field.accumulation[i])
            .sum();
        assert_eq!(sinks, 9.0);
    }

    #[test]
    fn test_neighbor_bounds() {
        assert_eq!(FlowDirection::West.neighbor(0, 0, 3, 3), None);
        assert_eq!(FlowDirection::North.neighbor(1, 0, 3, 3), None);
        assert_eq!(FlowDirection::SouthEast.neighbor(2, 2, 3, 3), None);
        assert_eq!(FlowDirection::SouthEast.neighbor(1, 1, 3, 3), Some((2, 2)));
    }
}
