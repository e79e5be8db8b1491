//! Colour legends handed to visualization consumers
//!
//! The engine renders nothing. It only publishes fixed, ordered breakpoint
//! tables so every consumer colours elevations and weathering depths the same
//! way.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Create a colour from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// One breakpoint: values at or above `threshold` take `color`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Lower bound of the band
    pub threshold: f64,
    /// Band colour
    pub color: Rgb,
    /// Human-readable band name
    pub label: String,
}

/// Ordered list of breakpoints, ascending by threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorLegend {
    /// What the legend measures, e.g. "Elevation (m)"
    pub title: String,
    /// Breakpoints in ascending threshold order
    pub entries: Vec<LegendEntry>,
}

impl ColorLegend {
    fn from_table(title: &str, table: &[(f64, Rgb, &str)]) -> Self {
        Self {
            title: title.to_string(),
            entries: table
                .iter()
                .map(|&(threshold, color, label)| LegendEntry {
                    threshold,
                    color,
                    label: label.to_string(),
                })
                .collect(),
        }
    }

    /// Hypsometric tint for terrain elevation in meters
    pub fn elevation() -> Self {
        Self::from_table(
            "Elevation (m)",
            &[
                (0.0, Rgb::new(0x1a, 0x96, 0x41), "Lowland"),
                (200.0, Rgb::new(0x8c, 0xc6, 0x3f), "Plains"),
                (500.0, Rgb::new(0xe6, 0xd8, 0x7e), "Hills"),
                (1000.0, Rgb::new(0xc2, 0x8e, 0x48), "Uplands"),
                (2000.0, Rgb::new(0x8b, 0x5a, 0x2b), "Mountains"),
                (3000.0, Rgb::new(0xf5, 0xf5, 0xf5), "High peaks"),
            ],
        )
    }

    /// Sequential ramp for elevation lost to weathering, in meters
    pub fn weathering() -> Self {
        Self::from_table(
            "Weathering depth (m)",
            &[
                (0.0, Rgb::new(0xff, 0xff, 0xcc), "Negligible"),
                (0.1, Rgb::new(0xff, 0xed, 0xa0), "Slight"),
                (1.0, Rgb::new(0xfe, 0xb2, 0x4c), "Moderate"),
                (10.0, Rgb::new(0xf0, 0x3b, 0x20), "Severe"),
                (50.0, Rgb::new(0xbd, 0x00, 0x26), "Extreme"),
            ],
        )
    }

    /// Highest breakpoint not above `value`
    ///
    /// Values below the first threshold fall in the first band. Returns `None`
    /// only for an empty legend.
    pub fn entry_for(&self, value: f64) -> Option<&LegendEntry> {
        self.entries
            .iter()
            .take_while(|entry| entry.threshold <= value)
            .last()
            .or_else(|| self.entries.first())
    }

    /// Colour of the band `value` falls in
    pub fn color_for(&self, value: f64) -> Option<Rgb> {
        self.entry_for(value).map(|entry| entry.color)
    }
}
