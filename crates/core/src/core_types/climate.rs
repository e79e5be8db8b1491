//! Climate inputs to the weathering rate model
//!
//! A `ClimateProfile` is fetched once per site and never modified afterwards.
//! Regional presets cover the broad climate classes used by the demo and tests.

use crate::core_types::units::{Celsius, Millimeters};
use crate::error::WeatheringError;
use serde::{Deserialize, Serialize};

/// Neutral pH; chemical weathering grows with distance from it
pub const NEUTRAL_PH: f64 = 7.0;

/// Long-term climate of a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateProfile {
    /// Mean annual temperature (signed)
    pub temperature: Celsius,
    /// Mean annual temperature range in °C (non-negative)
    pub temp_range: f64,
    /// Mean annual precipitation
    pub precipitation: Millimeters,
    /// Freeze-thaw cycles per year
    pub freeze_thaw_cycles: f64,
    /// Rain/soil water pH (0-14)
    pub ph: f64,
}

impl ClimateProfile {
    /// Create a validated climate profile
    ///
    /// # Errors
    ///
    /// Returns `WeatheringError::InvalidClimate` when any field is non-finite,
    /// a magnitude is negative, the temperature is below absolute zero, or pH
    /// lies outside 0-14.
    pub fn new(
        temperature: Celsius,
        temp_range: f64,
        precipitation: Millimeters,
        freeze_thaw_cycles: f64,
        ph: f64,
    ) -> Result<Self, WeatheringError> {
        let profile = Self {
            temperature,
            temp_range,
            precipitation,
            freeze_thaw_cycles,
            ph,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check every field against its documented range
    ///
    /// # Errors
    ///
    /// See [`ClimateProfile::new`].
    pub fn validate(&self) -> Result<(), WeatheringError> {
        let temperature = *self.temperature;
        if !temperature.is_finite() || self.temperature < Celsius::ABSOLUTE_ZERO {
            return Err(WeatheringError::InvalidClimate {
                field: "temperature",
                value: temperature,
            });
        }
        for (field, value) in [
            ("temp_range", self.temp_range),
            ("precipitation", *self.precipitation),
            ("freeze_thaw_cycles", self.freeze_thaw_cycles),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(WeatheringError::InvalidClimate { field, value });
            }
        }
        if !(0.0..=14.0).contains(&self.ph) {
            return Err(WeatheringError::InvalidClimate {
                field: "ph",
                value: self.ph,
            });
        }
        Ok(())
    }

    /// Mild, wet mid-latitude climate
    pub fn temperate() -> Self {
        Self {
            temperature: Celsius::new(12.0),
            temp_range: 18.0,
            precipitation: Millimeters::new(900.0),
            freeze_thaw_cycles: 40.0,
            ph: 6.2,
        }
    }

    /// Hot desert with large diurnal swings and little rain
    pub fn arid() -> Self {
        Self {
            temperature: Celsius::new(24.0),
            temp_range: 32.0,
            precipitation: Millimeters::new(150.0),
            freeze_thaw_cycles: 5.0,
            ph: 8.1,
        }
    }

    /// Cold high-altitude climate dominated by frost action
    pub fn alpine() -> Self {
        Self {
            temperature: Celsius::new(-2.0),
            temp_range: 22.0,
            precipitation: Millimeters::new(1400.0),
            freeze_thaw_cycles: 110.0,
            ph: 5.8,
        }
    }

    /// Hot, humid equatorial climate
    pub fn tropical() -> Self {
        Self {
            temperature: Celsius::new(27.0),
            temp_range: 6.0,
            precipitation: Millimeters::new(2600.0),
            freeze_thaw_cycles: 0.0,
            ph: 5.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for preset in [
            ClimateProfile::temperate(),
            ClimateProfile::arid(),
            ClimateProfile::alpine(),
            ClimateProfile::tropical(),
        ] {
            assert!(preset.validate().is_ok(), "{preset:?}");
        }
    }

    #[test]
    fn test_ph_out_of_range_rejected() {
        let err = ClimateProfile::new(
            Celsius::new(10.0),
            10.0,
            Millimeters::new(500.0),
            10.0,
            14.5,
        )
        .unwrap_err();
        assert_eq!(
            err,
            WeatheringError::InvalidClimate {
                field: "ph",
                value: 14.5
            }
        );
    }

    #[test]
    fn test_negative_precipitation_rejected() {
        let err = ClimateProfile::new(
            Celsius::new(10.0),
            10.0,
            Millimeters::new(-1.0),
            10.0,
            7.0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            WeatheringError::InvalidClimate {
                field: "precipitation",
                ..
            }
        ));
    }

    #[test]
    fn test_sub_zero_temperature_is_allowed() {
        let profile = ClimateProfile::new(
            Celsius::new(-15.0),
            30.0,
            Millimeters::new(300.0),
            80.0,
            6.5,
        );
        assert!(profile.is_ok());
    }
}
