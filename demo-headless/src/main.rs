use clap::Parser;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weathering_core::{
    ClimateProfile, GeologyProfile, SessionConfig, SiteQuery, SyntheticDatasetProvider,
    VegetationProfile, WeatheringError, WeatheringSession,
};

/// Terrain weathering demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "weathering-demo")]
#[command(about = "Project terrain weathering and erosion for a synthetic site", long_about = None)]
struct Args {
    /// Site latitude in degrees
    #[arg(long, default_value_t = 46.5, allow_negative_numbers = true)]
    latitude: f64,

    /// Site longitude in degrees
    #[arg(long, default_value_t = 8.0, allow_negative_numbers = true)]
    longitude: f64,

    /// Radius of the area of interest in km
    #[arg(short, long, default_value_t = 2.0)]
    radius_km: f64,

    /// Seed for the synthetic datasets
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Grid size in cells (square grid)
    #[arg(short, long, default_value_t = 64)]
    grid_size: usize,

    /// Projection horizon in years
    #[arg(short, long, default_value_t = 1000)]
    max_years: u32,

    /// Override the climate (temperate, arid, alpine, tropical)
    #[arg(long)]
    climate: Option<String>,

    /// Override the bedrock (granite, limestone, sandstone, shale)
    #[arg(long)]
    rock: Option<String>,

    /// Override the vegetation (barren, grassland, forest)
    #[arg(long)]
    vegetation: Option<String>,

    /// Project time steps on a single thread
    #[arg(long)]
    sequential: bool,
}

fn climate_preset(name: &str) -> Option<ClimateProfile> {
    match name.to_lowercase().as_str() {
        "temperate" => Some(ClimateProfile::temperate()),
        "arid" | "desert" => Some(ClimateProfile::arid()),
        "alpine" => Some(ClimateProfile::alpine()),
        "tropical" => Some(ClimateProfile::tropical()),
        _ => None,
    }
}

fn geology_preset(name: &str) -> Option<GeologyProfile> {
    match name.to_lowercase().as_str() {
        "granite" => Some(GeologyProfile::granite()),
        "limestone" => Some(GeologyProfile::limestone()),
        "sandstone" => Some(GeologyProfile::sandstone()),
        "shale" => Some(GeologyProfile::shale()),
        _ => None,
    }
}

fn vegetation_preset(name: &str) -> Option<VegetationProfile> {
    match name.to_lowercase().as_str() {
        "barren" => Some(VegetationProfile::barren()),
        "grassland" | "grass" => Some(VegetationProfile::grassland()),
        "forest" => Some(VegetationProfile::forest()),
        _ => None,
    }
}

fn build_session(args: &Args) -> Result<WeatheringSession, WeatheringError> {
    let provider = SyntheticDatasetProvider::new(args.seed, args.grid_size, args.grid_size);
    let query = SiteQuery::new(args.latitude, args.longitude, args.radius_km)?;
    let config = if args.sequential {
        SessionConfig::sequential()
    } else {
        SessionConfig::default()
    };
    let mut session = WeatheringSession::from_provider(&provider, &query, config)?;

    if let Some(name) = &args.climate {
        match climate_preset(name) {
            Some(climate) => session = session.with_climate(climate)?,
            None => println!("Unknown climate '{}', keeping synthetic climate", name),
        }
    }
    if let Some(name) = &args.rock {
        match geology_preset(name) {
            Some(geology) => session = session.with_geology(geology)?,
            None => println!("Unknown rock '{}', keeping synthetic geology", name),
        }
    }
    if let Some(name) = &args.vegetation {
        match vegetation_preset(name) {
            Some(vegetation) => session = session.with_vegetation(vegetation)?,
            None => println!("Unknown vegetation '{}', keeping synthetic cover", name),
        }
    }

    Ok(session)
}

fn run(args: &Args) -> Result<(), WeatheringError> {
    let session = build_session(args)?;
    let datasets = session.datasets();
    let base = session.base_grid();
    let base_stats = base.stats();

    println!(
        "Site: {:.3}°, {:.3}° (radius {:.1} km)",
        args.latitude, args.longitude, args.radius_km
    );
    println!(
        "Terrain: {}x{} cells of {:.1} m, elevation {:.0}-{:.0} m (mean {:.0} m)",
        base.width(),
        base.height(),
        *base.cell_size(),
        *base_stats.min,
        *base_stats.max,
        *base_stats.mean
    );
    println!(
        "Climate: {}, range {:.1} °C, {}/yr, {:.0} freeze-thaw cycles, pH {:.1}",
        datasets.climate.temperature,
        datasets.climate.temp_range,
        datasets.climate.precipitation,
        datasets.climate.freeze_thaw_cycles,
        datasets.climate.ph
    );
    println!(
        "Geology: {} (hardness {:.1}, reactivity {:.2})",
        datasets.geology.rock_type,
        datasets.geology.rock_type.hardness_index(),
        datasets.geology.mineral_reactivity()
    );
    println!(
        "Vegetation: {} cover, roots to {}\n",
        datasets.vegetation.coverage, datasets.vegetation.root_depth
    );

    let rates = session.rates();
    println!("Rates: {}", rates);
    println!(
        "Combined: {:.3} mm/yr before terrain modulation\n",
        rates.total_combined_rate() * 1000.0
    );

    let models = session.model_set(args.max_years);
    let summaries = models.summaries(base)?;
    info!(steps = summaries.len(), "Projection finished");

    println!(
        "{:>8} {:>10} {:>10} {:>12} {:>12} {:>12}  {}",
        "Years", "Min (m)", "Max (m)", "Mean loss", "Max loss", "Max gain", "Severity"
    );
    for summary in &summaries {
        let severity = models
            .weathering_legend
            .entry_for(summary.max_loss)
            .map_or("-", |entry| entry.label.as_str());
        println!(
            "{:>8} {:>10.2} {:>10.2} {:>12.4} {:>12.4} {:>12.4}  {}",
            summary.years,
            *summary.stats.min,
            *summary.stats.max,
            summary.mean_loss,
            summary.max_loss,
            summary.max_gain,
            severity
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    println!("=== Terrain Weathering Demo ===\n");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}
