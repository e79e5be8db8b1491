//! Weathering physics
//!
//! Rate laws that turn site datasets into scalar weathering rates.

pub mod weathering_rates;

pub use weathering_rates::{
    biological_temperature_factor, calculate_biological_rate, calculate_chemical_rate,
    calculate_physical_rate, EnvironmentalRateModel, WeatheringRates,
};
