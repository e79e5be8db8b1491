//! Site-level orchestration
//!
//! - [`provider`]: dataset acquisition behind the [`DatasetProvider`] trait
//! - [`session`]: [`WeatheringSession`] binding datasets to the solvers
//! - [`config`]: tunable coefficients for a session
//! - [`legend`]: colour breakpoints for visualization consumers

pub mod config;
pub mod legend;
pub mod provider;
pub mod session;

// Re-export public types
pub use config::SessionConfig;
pub use legend::{ColorLegend, LegendEntry, Rgb};
pub use provider::{DatasetBundle, DatasetProvider, SiteQuery, SyntheticDatasetProvider};
pub use session::{ModelSet, StepSummary, WeatheringSession};
