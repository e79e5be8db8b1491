//! Terrain evolution solvers
//!
//! This module holds the grid-mutating half of the engine:
//!
//! - [`WeatheringProjector`] clones a base grid and applies cumulative
//!   weathering, modulated per cell by slope, aspect and altitude
//! - [`ErosionSimulator`] routes flow over the weathered snapshot and applies
//!   erosion and deposition in place
//! - [`FlowField`] is the deterministic D8 routing both rely on
//!
//! # Example
//!
//! ```
//! use weathering_core::core_types::Meters;
//! use weathering_core::grid::TerrainGrid;
//! use weathering_core::physics::WeatheringRates;
//! use weathering_core::solver::WeatheringProjector;
//!
//! let base = TerrainGrid::flat(8, 8, 25.0, Meters::new(400.0)).unwrap();
//! let rates = WeatheringRates { physical: 0.3, chemical: 0.5, biological: 0.4 };
//! let snapshot = WeatheringProjector::default().project(&base, &rates, 100);
//! assert!(snapshot.elevation(4, 4) < base.elevation(4, 4) + 0.01);
//! ```

pub mod erosion;
pub mod flow;
pub mod projector;

// Re-exports
pub use erosion::{ErosionConfig, ErosionSimulator};
pub use flow::{compute_flow_accumulation, compute_flow_directions, FlowDirection, FlowField};
pub use projector::{select_time_steps, ProjectionConfig, WeatheringProjector};
