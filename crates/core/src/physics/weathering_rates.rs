//! Environmental weathering rates from climate, geology and vegetation.
//!
//! Three mechanisms break rock down in place:
//!
//! - **Physical**: thermal cycling, frost wedging and wetting/drying, scaled by
//!   how readily the rock type fractures.
//! - **Chemical**: dissolution and hydrolysis, driven by warmth, water supply,
//!   mineral reactivity and departures from neutral pH.
//! - **Biological**: root wedging and organic acids, driven by vegetation cover,
//!   rooting depth and how close the climate is to the growth optimum.
//!
//! Each rate is dimensionless, roughly in `[0, 1.5]`. The combined rate
//! converts them into meters of elevation loss per year for the projector.
//!
//! Factors are not clamped unless noted. The biological temperature term in
//! particular follows a triangular law peaking at 25°C that goes negative
//! below 0°C and above 50°C; downstream consumers see that sign.

use crate::core_types::climate::{ClimateProfile, NEUTRAL_PH};
use crate::core_types::geology::GeologyProfile;
use crate::core_types::vegetation::VegetationProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Temperature range giving a physical range factor of 1 (°C)
const REFERENCE_TEMP_RANGE: f64 = 40.0;
/// Freeze-thaw cycles per year giving a factor of 1
const REFERENCE_FREEZE_THAW_CYCLES: f64 = 100.0;
/// Annual precipitation giving a factor of 1 (mm)
const REFERENCE_PRECIPITATION: f64 = 2000.0;
/// Temperature at which the chemical temperature factor saturates (°C)
const CHEMICAL_SATURATION_TEMP: f64 = 30.0;
/// Optimum temperature for biological activity (°C)
const BIOLOGICAL_OPTIMUM_TEMP: f64 = 25.0;
/// Half-width of the biological temperature triangle (°C)
const BIOLOGICAL_TEMP_HALF_WIDTH: f64 = 25.0;
/// Root depth giving a biological root factor of 1 (m)
const REFERENCE_ROOT_DEPTH: f64 = 10.0;
/// Converts the weighted rate blend into meters of loss per year
const RATE_TO_METERS_PER_YEAR: f64 = 1000.0;

/// Derived weathering rates of a site
///
/// Always recomputed from the datasets that produced them; never cached per
/// cell or persisted on their own.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatheringRates {
    /// Physical (mechanical) weathering rate
    pub physical: f64,
    /// Chemical weathering rate
    pub chemical: f64,
    /// Biological weathering rate (may be negative in extreme climates)
    pub biological: f64,
}

impl WeatheringRates {
    /// Elevation loss per year in meters
    ///
    /// `(physical * 0.4 + chemical * 0.4 + biological * 0.2) / 1000`
    #[must_use]
    pub fn total_combined_rate(&self) -> f64 {
        (self.physical * 0.4 + self.chemical * 0.4 + self.biological * 0.2)
            / RATE_TO_METERS_PER_YEAR
    }
}

impl fmt::Display for WeatheringRates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "physical {:.3}, chemical {:.3}, biological {:.3}",
            self.physical, self.chemical, self.biological
        )
    }
}

/// Pure rate model over the three site datasets
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentalRateModel;

impl EnvironmentalRateModel {
    /// Compute all three rates for a site
    #[must_use]
    pub fn compute_rates(
        climate: &ClimateProfile,
        geology: &GeologyProfile,
        vegetation: &VegetationProfile,
    ) -> WeatheringRates {
        WeatheringRates {
            physical: calculate_physical_rate(climate, geology),
            chemical: calculate_chemical_rate(climate, geology),
            biological: calculate_biological_rate(climate, vegetation),
        }
    }
}

/// Physical weathering rate
///
/// ```text
/// (0.4 * range/40 + 0.4 * cycles/100 + 0.2 * precip/2000) * hardness
/// ```
///
/// None of the climate factors are capped.
#[must_use]
pub fn calculate_physical_rate(climate: &ClimateProfile, geology: &GeologyProfile) -> f64 {
    let temp_range_factor = climate.temp_range / REFERENCE_TEMP_RANGE;
    let freeze_thaw_factor = climate.freeze_thaw_cycles / REFERENCE_FREEZE_THAW_CYCLES;
    let precipitation_factor = *climate.precipitation / REFERENCE_PRECIPITATION;

    (temp_range_factor * 0.4 + freeze_thaw_factor * 0.4 + precipitation_factor * 0.2)
        * geology.rock_type.hardness_index()
}

/// Chemical weathering rate
///
/// ```text
/// 0.3 * min(T/30, 1) + 0.3 * min(precip/2000, 1) + 0.3 * reactivity + 0.1 * |pH-7|/7
/// ```
///
/// The temperature factor has no lower bound, so sub-zero climates reduce
/// the rate.
#[must_use]
pub fn calculate_chemical_rate(climate: &ClimateProfile, geology: &GeologyProfile) -> f64 {
    let temp_factor = (*climate.temperature / CHEMICAL_SATURATION_TEMP).min(1.0);
    let precipitation_factor = (*climate.precipitation / REFERENCE_PRECIPITATION).min(1.0);
    let mineral_factor = geology.mineral_reactivity();
    let ph_factor = (climate.ph - NEUTRAL_PH).abs() / NEUTRAL_PH;

    temp_factor * 0.3 + precipitation_factor * 0.3 + mineral_factor * 0.3 + ph_factor * 0.1
}

/// Triangular temperature suitability for biological activity
///
/// 1 at 25°C, 0 at 0°C and 50°C, negative beyond. Deliberately unclamped.
#[must_use]
pub fn biological_temperature_factor(temperature: f64) -> f64 {
    1.0 - (temperature - BIOLOGICAL_OPTIMUM_TEMP).abs() / BIOLOGICAL_TEMP_HALF_WIDTH
}

/// Biological weathering rate
///
/// ```text
/// 0.4 * coverage/100 + 0.3 * root_depth/10 + 0.3 * (1 - |T-25|/25)
/// ```
#[must_use]
pub fn calculate_biological_rate(climate: &ClimateProfile, vegetation: &VegetationProfile) -> f64 {
    let coverage_factor = vegetation.coverage.to_fraction();
    let root_factor = *vegetation.root_depth / REFERENCE_ROOT_DEPTH;
    let temp_factor = biological_temperature_factor(*climate.temperature);

    coverage_factor * 0.4 + root_factor * 0.3 + temp_factor * 0.3
}
