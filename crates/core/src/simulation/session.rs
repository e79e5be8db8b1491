//! Weathering session: datasets in, projected terrain snapshots out
//!
//! A session owns one validated [`DatasetBundle`]. Rates are always
//! recomputed from the datasets, so replacing a dataset (`with_climate` and
//! friends) yields a new session whose rates and projections reflect it, and
//! the original session is left as it was.
//!
//! Projections for different time steps are independent: each clones the
//! base grid, so [`WeatheringSession::generate_models`] can fan them out over
//! rayon without any shared mutable state.

use crate::core_types::{ClimateProfile, GeologyProfile, VegetationProfile};
use crate::error::WeatheringError;
use crate::grid::{ElevationStats, TerrainGrid};
use crate::physics::{EnvironmentalRateModel, WeatheringRates};
use crate::simulation::config::SessionConfig;
use crate::simulation::legend::ColorLegend;
use crate::simulation::provider::{DatasetBundle, DatasetProvider, SiteQuery};
use crate::solver::{select_time_steps, WeatheringProjector};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Weathering engine bound to one site
#[derive(Debug, Clone)]
pub struct WeatheringSession {
    datasets: DatasetBundle,
    config: SessionConfig,
    projector: WeatheringProjector,
}

impl WeatheringSession {
    /// Create a session over validated datasets
    ///
    /// # Errors
    ///
    /// Returns the first validation error of any dataset; no session is built
    /// from partial input.
    pub fn new(datasets: DatasetBundle, config: SessionConfig) -> Result<Self, WeatheringError> {
        datasets.validate()?;
        let session = Self {
            projector: config.projector(),
            datasets,
            config,
        };

        info!(
            width = session.datasets.elevation.width(),
            height = session.datasets.elevation.height(),
            rock = %session.datasets.geology.rock_type,
            parallel = config.parallel,
            "Weathering session created (rates: {})",
            session.rates()
        );
        if session.total_combined_rate() < 0.0 {
            warn!(
                rate = session.total_combined_rate(),
                "Combined weathering rate is negative; projections will raise the terrain"
            );
        }

        Ok(session)
    }

    /// Fetch datasets for `query` from `provider` and build a session
    ///
    /// # Errors
    ///
    /// Propagates provider and validation errors.
    pub fn from_provider<P: DatasetProvider + ?Sized>(
        provider: &P,
        query: &SiteQuery,
        config: SessionConfig,
    ) -> Result<Self, WeatheringError> {
        Self::new(provider.fetch(query)?, config)
    }

    fn with_datasets(&self, datasets: DatasetBundle) -> Result<Self, WeatheringError> {
        Self::new(datasets, self.config)
    }

    /// Same site with a different climate
    ///
    /// # Errors
    ///
    /// Returns `WeatheringError::InvalidClimate` for an out-of-range profile.
    pub fn with_climate(&self, climate: ClimateProfile) -> Result<Self, WeatheringError> {
        self.with_datasets(DatasetBundle {
            climate,
            ..self.datasets.clone()
        })
    }

    /// Same site with different bedrock
    ///
    /// # Errors
    ///
    /// Returns a geology validation error for an unusable composition.
    pub fn with_geology(&self, geology: GeologyProfile) -> Result<Self, WeatheringError> {
        self.with_datasets(DatasetBundle {
            geology,
            ..self.datasets.clone()
        })
    }

    /// Same site with different vegetation
    ///
    /// # Errors
    ///
    /// Returns `WeatheringError::InvalidVegetation` for an out-of-range profile.
    pub fn with_vegetation(&self, vegetation: VegetationProfile) -> Result<Self, WeatheringError> {
        self.with_datasets(DatasetBundle {
            vegetation,
            ..self.datasets.clone()
        })
    }

    /// Same site conditions over a different elevation model
    ///
    /// # Errors
    ///
    /// Returns a grid validation error for a malformed grid.
    pub fn with_elevation(&self, elevation: TerrainGrid) -> Result<Self, WeatheringError> {
        self.with_datasets(DatasetBundle {
            elevation,
            ..self.datasets.clone()
        })
    }

    /// Same datasets under different settings
    pub fn with_config(&self, config: SessionConfig) -> Self {
        Self {
            datasets: self.datasets.clone(),
            projector: config.projector(),
            config,
        }
    }

    /// Loaded datasets
    pub fn datasets(&self) -> &DatasetBundle {
        &self.datasets
    }

    /// Unmodified elevation model
    pub fn base_grid(&self) -> &TerrainGrid {
        &self.datasets.elevation
    }

    /// Active settings
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Weathering rates of the current datasets
    pub fn rates(&self) -> WeatheringRates {
        EnvironmentalRateModel::compute_rates(
            &self.datasets.climate,
            &self.datasets.geology,
            &self.datasets.vegetation,
        )
    }

    /// Elevation loss per year in meters before terrain modulation
    pub fn total_combined_rate(&self) -> f64 {
        self.rates().total_combined_rate()
    }

    /// Weathered and eroded snapshot of the base grid after `years`
    pub fn project(&self, years: u32) -> TerrainGrid {
        let rates = self.rates();
        debug!(years, "Projecting terrain ({})", rates);
        self.projector.project(self.base_grid(), &rates, years)
    }

    /// One snapshot per time step selected for `max_years`
    ///
    /// Keys are the selected steps; step 0 reproduces the base grid.
    pub fn generate_models(&self, max_years: u32) -> BTreeMap<u32, TerrainGrid> {
        let steps = select_time_steps(max_years);
        let rates = self.rates();
        let base = self.base_grid();
        let project = |&years: &u32| (years, self.projector.project(base, &rates, years));

        let models: BTreeMap<u32, TerrainGrid> = if self.config.parallel {
            steps.par_iter().map(project).collect()
        } else {
            steps.iter().map(project).collect()
        };

        info!(
            max_years,
            steps = models.len(),
            parallel = self.config.parallel,
            "Generated terrain models"
        );

        models
    }

    /// Snapshots plus the rates and legends needed to present them
    pub fn model_set(&self, max_years: u32) -> ModelSet {
        ModelSet {
            rates: self.rates(),
            models: self.generate_models(max_years),
            elevation_legend: ColorLegend::elevation(),
            weathering_legend: ColorLegend::weathering(),
        }
    }
}

/// Elevation change of one snapshot relative to the base grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepSummary {
    /// Projected years
    pub years: u32,
    /// Elevation statistics of the snapshot
    pub stats: ElevationStats,
    /// Mean material lost per cell in meters (negative means net gain)
    pub mean_loss: f64,
    /// Largest loss of any cell in meters
    pub max_loss: f64,
    /// Largest gain of any cell in meters
    pub max_gain: f64,
}

/// Result of a multi-step projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSet {
    /// Rates the snapshots were projected with
    pub rates: WeatheringRates,
    /// Snapshots keyed by projected years, ascending
    pub models: BTreeMap<u32, TerrainGrid>,
    /// Colour scale for elevation maps
    pub elevation_legend: ColorLegend,
    /// Colour scale for weathering-depth maps
    pub weathering_legend: ColorLegend,
}

impl ModelSet {
    /// Snapshot for exactly `years`, if that step was generated
    pub fn get(&self, years: u32) -> Option<&TerrainGrid> {
        self.models.get(&years)
    }

    /// Selected time steps, ascending
    pub fn time_steps(&self) -> Vec<u32> {
        self.models.keys().copied().collect()
    }

    /// Per-step change relative to `base`
    ///
    /// # Errors
    ///
    /// Returns `WeatheringError::DimensionMismatch` if `base` is not the grid
    /// the snapshots were projected from.
    pub fn summaries(&self, base: &TerrainGrid) -> Result<Vec<StepSummary>, WeatheringError> {
        self.models
            .iter()
            .map(|(&years, grid)| {
                if grid.len() != base.len() {
                    return Err(WeatheringError::DimensionMismatch {
                        expected: base.len(),
                        actual: grid.len(),
                    });
                }
                let (total, max_loss, max_gain) = base
                    .elevations()
                    .iter()
                    .zip(grid.elevations())
                    .map(|(before, after)| before - after)
                    .fold((0.0, 0.0_f64, 0.0_f64), |(total, loss, gain), delta| {
                        (total + delta, loss.max(delta), gain.max(-delta))
                    });
                Ok(StepSummary {
                    years,
                    stats: grid.stats(),
                    mean_loss: total / base.len() as f64,
                    max_loss,
                    max_gain,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::{Celsius, Meters, Millimeters};
    use approx::assert_relative_eq;

    fn bundle() -> DatasetBundle {
        DatasetBundle {
            elevation: TerrainGrid::single_hill(
                17,
                17,
                20.0,
                Meters::new(600.0),
                Meters::new(150.0),
                Meters::new(80.0),
            )
            .unwrap(),
            geology: GeologyProfile::granite(),
            climate: ClimateProfile::temperate(),
            vegetation: VegetationProfile::grassland(),
        }
    }

    #[test]
    fn test_new_rejects_invalid_datasets() {
        let mut bad = bundle();
        bad.vegetation.coverage = crate::core_types::units::Percent::new(120.0);
        assert!(matches!(
            WeatheringSession::new(bad, SessionConfig::default()),
            Err(WeatheringError::InvalidVegetation {
                field: "coverage",
                ..
            })
        ));

        let mut bad = bundle();
        bad.geology.mineral_composition.clear();
        assert_eq!(
            WeatheringSession::new(bad, SessionConfig::default()).err(),
            Some(WeatheringError::EmptyMineralComposition)
        );
    }

    #[test]
    fn test_rates_follow_replaced_datasets() {
        let session = WeatheringSession::new(bundle(), SessionConfig::default()).unwrap();
        let before = session.rates();

        let wetter = ClimateProfile {
            precipitation: Millimeters::new(2500.0),
            ..ClimateProfile::temperate()
        };
        let updated = session.with_climate(wetter).unwrap();
        assert!(updated.rates().physical > before.physical);
        // Original session unchanged
        assert_eq!(session.rates(), before);

        let frozen = ClimateProfile {
            temperature: Celsius::new(-300.0),
            ..ClimateProfile::temperate()
        };
        assert!(session.with_climate(frozen).is_err());
    }

    #[test]
    fn test_generate_models_keys_and_base() {
        let session = WeatheringSession::new(bundle(), SessionConfig::sequential()).unwrap();
        let models = session.generate_models(75);
        assert_eq!(models.keys().copied().collect::<Vec<_>>(), vec![0, 10, 25, 50]);
        assert_eq!(&models[&0], session.base_grid());
        assert_eq!(models[&50], session.project(50));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = WeatheringSession::new(bundle(), SessionConfig::sequential()).unwrap();
        let parallel = sequential.with_config(SessionConfig::default());
        assert_eq!(sequential.generate_models(1000), parallel.generate_models(1000));
    }

    #[test]
    fn test_summaries() {
        let session = WeatheringSession::new(bundle(), SessionConfig::default()).unwrap();
        let set = session.model_set(1000);
        assert_eq!(set.time_steps(), vec![0, 100, 250, 500, 1000]);

        let summaries = set.summaries(session.base_grid()).unwrap();
        assert_eq!(summaries.len(), 5);
        assert_eq!(summaries[0].mean_loss, 0.0);
        assert_eq!(summaries[0].max_loss, 0.0);
        for pair in summaries.windows(2) {
            assert!(pair[1].mean_loss > pair[0].mean_loss);
        }
        let last = summaries[4];
        assert_relative_eq!(
            *last.stats.mean,
            *session.base_grid().stats().mean - last.mean_loss,
            epsilon = 1e-9
        );

        let wrong = TerrainGrid::flat(2, 2, 1.0, Meters::new(0.0)).unwrap();
        assert!(set.summaries(&wrong).is_err());
    }
}
