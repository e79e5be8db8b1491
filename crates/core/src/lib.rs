//! Terrain Weathering Core Library
//!
//! Projects how a landscape wears down over time. Site datasets (elevation,
//! geology, climate, vegetation) are reduced to three weathering rates, which
//! are then applied cell by cell to a Digital Elevation Model, modulated by
//! local slope, aspect and altitude. A D8 flow-routing erosion pass finishes
//! each snapshot.
//!
//! ## Layout
//!
//! - [`core_types`]: unit newtypes and the climate, geology and vegetation
//!   datasets
//! - [`grid`]: the elevation grid and its slope/aspect sampler
//! - [`physics`]: the environmental rate model
//! - [`solver`]: weathering projection, flow routing, erosion and deposition
//! - [`simulation`]: sessions, dataset providers and legends
//!
//! ## Example
//!
//! ```
//! use weathering_core::{SessionConfig, SiteQuery, SyntheticDatasetProvider, WeatheringSession};
//!
//! let provider = SyntheticDatasetProvider::new(7, 32, 32);
//! let query = SiteQuery::new(46.5, 8.0, 2.0).unwrap();
//! let session = WeatheringSession::from_provider(&provider, &query, SessionConfig::default()).unwrap();
//!
//! let models = session.generate_models(1000);
//! assert_eq!(models.keys().copied().collect::<Vec<_>>(), vec![0, 100, 250, 500, 1000]);
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Terrain representation and sampling
pub mod grid;

// Rate laws
pub mod physics;

// Grid-mutating solvers
pub mod solver;

// Session orchestration
pub mod simulation;

// Re-export core types
pub use core_types::{
    Celsius, ClimateProfile, Degrees, GeologyProfile, Meters, Millimeters, Mineral, Percent,
    Radians, RockType, VegetationProfile,
};
pub use error::WeatheringError;

// Re-export grid and solver types
pub use grid::{ElevationStats, SlopeAspectField, TerrainGrid};
pub use physics::{EnvironmentalRateModel, WeatheringRates};
pub use solver::{
    select_time_steps, ErosionConfig, ErosionSimulator, FlowDirection, FlowField,
    ProjectionConfig, WeatheringProjector,
};

// Re-export session types
pub use simulation::{
    ColorLegend, DatasetBundle, DatasetProvider, ModelSet, SessionConfig, SiteQuery, StepSummary,
    SyntheticDatasetProvider, WeatheringSession,
};
