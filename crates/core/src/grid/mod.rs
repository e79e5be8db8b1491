//! Grid-based terrain modules

pub mod sampler;
pub mod terrain;

// Re-export main types
pub use sampler::{aspect_radians, gradient, slope_degrees, SlopeAspectField};
pub use terrain::*;
