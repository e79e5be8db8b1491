//! Bedrock and mineral inputs to the weathering rate model

use crate::error::WeatheringError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hardness index applied to rock types with no entry of their own
pub const DEFAULT_HARDNESS_INDEX: f64 = 0.5;

/// Reactivity used when a composition names no recognised mineral
pub const DEFAULT_MINERAL_REACTIVITY: f64 = 0.5;

/// Dominant bedrock type of a site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RockType {
    /// Coarse crystalline igneous rock
    Granite,
    /// Carbonate sedimentary rock
    Limestone,
    /// Clastic sedimentary rock of sand-sized grains
    Sandstone,
    /// Fine-grained, fissile mudrock
    Shale,
    /// Any rock without a dedicated hardness entry
    Other,
}

impl RockType {
    /// Multiplier applied to the physical weathering blend
    ///
    /// Unknown rock types fall back to [`DEFAULT_HARDNESS_INDEX`] rather than
    /// failing.
    #[must_use]
    pub const fn hardness_index(self) -> f64 {
        match self {
            Self::Granite => 0.2,
            Self::Limestone => 0.6,
            Self::Sandstone => 0.8,
            Self::Shale => 0.9,
            Self::Other => DEFAULT_HARDNESS_INDEX,
        }
    }

    /// Parse a rock name case-insensitively; unrecognised names map to `Other`
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "granite" => Self::Granite,
            "limestone" => Self::Limestone,
            "sandstone" => Self::Sandstone,
            "shale" => Self::Shale,
            _ => Self::Other,
        }
    }
}

impl FromStr for RockType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for RockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Granite => "granite",
            Self::Limestone => "limestone",
            Self::Sandstone => "sandstone",
            Self::Shale => "shale",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Minerals with a known chemical reactivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mineral {
    /// SiO2, nearly inert
    Quartz,
    /// Hydrolyses to clay
    Feldspar,
    /// Sheet silicate
    Mica,
    /// Carbonate, dissolves readily in acidic water
    Calcite,
    /// Magnesium carbonate
    Dolomite,
}

impl Mineral {
    /// Relative chemical reactivity (0-1)
    #[must_use]
    pub const fn reactivity(self) -> f64 {
        match self {
            Self::Quartz => 0.1,
            Self::Feldspar => 0.7,
            Self::Mica => 0.5,
            Self::Calcite => 0.9,
            Self::Dolomite => 0.8,
        }
    }

    /// Look up a mineral by name, case-insensitively
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "quartz" => Some(Self::Quartz),
            "feldspar" => Some(Self::Feldspar),
            "mica" => Some(Self::Mica),
            "calcite" => Some(Self::Calcite),
            "dolomite" => Some(Self::Dolomite),
            _ => None,
        }
    }
}

/// Bedrock description of a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeologyProfile {
    /// Dominant rock type
    pub rock_type: RockType,
    /// Mineral name -> fractional abundance in `[0, 1]` (need not sum to 1)
    pub mineral_composition: FxHashMap<String, f64>,
}

impl GeologyProfile {
    /// Create a validated geology profile
    ///
    /// # Errors
    ///
    /// Returns `WeatheringError::EmptyMineralComposition` when no minerals are
    /// given and `WeatheringError::InvalidMineralAbundance` when an abundance
    /// is outside `[0, 1]`.
    pub fn new<I, S>(rock_type: RockType, minerals: I) -> Result<Self, WeatheringError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let profile = Self {
            rock_type,
            mineral_composition: minerals
                .into_iter()
                .map(|(name, abundance)| (name.into(), abundance))
                .collect(),
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check the composition against its documented range
    ///
    /// # Errors
    ///
    /// See [`GeologyProfile::new`].
    pub fn validate(&self) -> Result<(), WeatheringError> {
        if self.mineral_composition.is_empty() {
            return Err(WeatheringError::EmptyMineralComposition);
        }
        for (mineral, &value) in &self.mineral_composition {
            if !(0.0..=1.0).contains(&value) {
                return Err(WeatheringError::InvalidMineralAbundance {
                    mineral: mineral.clone(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Abundance-weighted mean reactivity of the recognised minerals
    ///
    /// Unrecognised minerals are excluded from both numerator and denominator.
    /// When nothing recognised remains (or its abundances sum to zero) the
    /// result is [`DEFAULT_MINERAL_REACTIVITY`].
    #[must_use]
    pub fn mineral_reactivity(&self) -> f64 {
        let (weighted, total) = self
            .mineral_composition
            .iter()
            .filter_map(|(name, &abundance)| {
                Mineral::from_name(name).map(|mineral| (mineral.reactivity(), abundance))
            })
            .fold((0.0, 0.0), |(weighted, total), (reactivity, abundance)| {
                (weighted + reactivity * abundance, total + abundance)
            });

        if total > 0.0 {
            weighted / total
        } else {
            DEFAULT_MINERAL_REACTIVITY
        }
    }

    /// Typical granite: quartz, feldspar and mica
    pub fn granite() -> Self {
        Self {
            rock_type: RockType::Granite,
            mineral_composition: composition(&[("quartz", 0.3), ("feldspar", 0.6), ("mica", 0.1)]),
        }
    }

    /// Typical limestone: mostly calcite
    pub fn limestone() -> Self {
        Self {
            rock_type: RockType::Limestone,
            mineral_composition: composition(&[("calcite", 0.9), ("dolomite", 0.05), ("quartz", 0.05)]),
        }
    }

    /// Typical quartz sandstone
    pub fn sandstone() -> Self {
        Self {
            rock_type: RockType::Sandstone,
            mineral_composition: composition(&[("quartz", 0.8), ("feldspar", 0.15), ("calcite", 0.05)]),
        }
    }

    /// Typical shale with clay minerals the reactivity table does not cover
    pub fn shale() -> Self {
        Self {
            rock_type: RockType::Shale,
            mineral_composition: composition(&[("clay", 0.6), ("quartz", 0.25), ("mica", 0.15)]),
        }
    }
}

fn composition(entries: &[(&str, f64)]) -> FxHashMap<String, f64> {
    entries
        .iter()
        .map(|&(name, abundance)| (name.to_string(), abundance))
        .collect()
}
