//! End-to-end sessions built from synthetic site datasets
mod common;

use approx::assert_relative_eq;
use weathering_core::core_types::{Celsius, Meters, Millimeters};
use weathering_core::simulation::ColorLegend;
use weathering_core::{
    ClimateProfile, DatasetProvider, GeologyProfile, SessionConfig, SiteQuery,
    SyntheticDatasetProvider, TerrainGrid, VegetationProfile, WeatheringError, WeatheringSession,
};

fn session(config: SessionConfig) -> WeatheringSession {
    let provider = SyntheticDatasetProvider::new(2024, 24, 20);
    let query = SiteQuery::new(-37.8, 145.0, 1.5).unwrap();
    WeatheringSession::from_provider(&provider, &query, config).unwrap()
}

#[test]
fn test_session_from_synthetic_site() {
    let session = session(SessionConfig::default());
    assert_eq!(session.base_grid().width(), 24);
    assert_eq!(session.base_grid().height(), 20);
    assert!(session.total_combined_rate().is_finite());
}

#[test]
fn test_parallel_and_sequential_models_agree() {
    let parallel = session(SessionConfig::default());
    let sequential = session(SessionConfig::sequential());
    assert_eq!(parallel.generate_models(100), sequential.generate_models(100));
    assert_eq!(
        parallel.generate_models(100_000),
        sequential.generate_models(100_000)
    );
}

#[test]
fn test_model_set_matches_single_projections() {
    let session = session(SessionConfig::default());
    let set = session.model_set(75);

    assert_eq!(set.time_steps(), vec![0, 10, 25, 50]);
    assert_eq!(set.rates, session.rates());
    assert_eq!(set.get(0), Some(session.base_grid()));
    assert_eq!(set.get(25), Some(&session.project(25)));
    assert_eq!(set.get(75), None);
    assert_eq!(set.elevation_legend, ColorLegend::elevation());
    assert_eq!(set.weathering_legend, ColorLegend::weathering());
}

#[test]
fn test_summaries_track_loss() {
    let session = session(SessionConfig::default());
    let set = session.model_set(1000);
    let summaries = set.summaries(session.base_grid()).unwrap();

    assert_eq!(
        summaries.iter().map(|s| s.years).collect::<Vec<_>>(),
        vec![0, 100, 250, 500, 1000]
    );
    for summary in &summaries {
        let grid = &set.models[&summary.years];
        assert_relative_eq!(
            *summary.stats.mean,
            *session.base_grid().stats().mean - summary.mean_loss,
            epsilon = 1e-6
        );
        assert!(summary.max_loss >= 0.0);
        assert!(summary.max_gain >= 0.0);
        assert_eq!(summary.stats, grid.stats());
    }
}

#[test]
fn test_replacing_datasets_builds_new_session() {
    let base = session(SessionConfig::sequential());
    let original_rates = base.rates();

    let alpine = base.with_climate(ClimateProfile::alpine()).unwrap();
    assert_eq!(alpine.datasets().climate, ClimateProfile::alpine());
    assert_eq!(base.rates(), original_rates);

    // Physical rate scales with hardness alone
    let per_hardness = original_rates.physical / base.datasets().geology.rock_type.hardness_index();
    let limestone = base.with_geology(GeologyProfile::limestone()).unwrap();
    assert_relative_eq!(limestone.rates().physical, per_hardness * 0.6, epsilon = 1e-12);

    let forest = base.with_vegetation(VegetationProfile::forest()).unwrap();
    assert_eq!(forest.datasets().vegetation, VegetationProfile::forest());

    let flat = TerrainGrid::flat(4, 4, 5.0, Meters::new(100.0)).unwrap();
    let flat_session = base.with_elevation(flat.clone()).unwrap();
    assert_eq!(flat_session.base_grid(), &flat);
    assert_eq!(flat_session.rates(), original_rates);
}

#[test]
fn test_invalid_replacements_are_rejected() {
    let base = session(SessionConfig::default());

    let acid = ClimateProfile {
        ph: 15.0,
        ..ClimateProfile::temperate()
    };
    assert!(matches!(
        base.with_climate(acid),
        Err(WeatheringError::InvalidClimate { field: "ph", .. })
    ));

    let negative_rain = ClimateProfile {
        precipitation: Millimeters::new(-1.0),
        ..ClimateProfile::temperate()
    };
    assert!(base.with_climate(negative_rain).is_err());

    let too_cold = ClimateProfile {
        temperature: Celsius::new(-500.0),
        ..ClimateProfile::temperate()
    };
    assert!(base.with_climate(too_cold).is_err());
}

#[test]
fn test_invalid_query_is_rejected() {
    let provider = SyntheticDatasetProvider::default();
    let query = SiteQuery {
        latitude: 12.0,
        longitude: 200.0,
        radius_km: 1.0,
    };
    assert_eq!(
        provider.fetch(&query),
        Err(WeatheringError::InvalidQuery {
            field: "longitude",
            value: 200.0
        })
    );
    assert!(WeatheringSession::from_provider(&provider, &query, SessionConfig::default()).is_err());
}
