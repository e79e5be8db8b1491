//! Validation errors raised when datasets or grids are malformed
//!
//! The engine never produces partial output from bad input: every validating
//! constructor returns a `WeatheringError` describing the first problem found.

/// Errors that can occur while building grids, datasets or sessions
#[derive(Debug, Clone, PartialEq)]
pub enum WeatheringError {
    /// Grid has zero width or height
    EmptyGrid {
        /// Requested width in cells
        width: usize,
        /// Requested height in cells
        height: usize,
    },
    /// Elevation buffer does not match `width * height`, or a row is jagged
    DimensionMismatch {
        /// Number of values required
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },
    /// Cell size must be finite and positive
    InvalidCellSize(f64),
    /// An elevation sample is NaN or infinite
    NonFiniteElevation {
        /// Column of the offending cell
        x: usize,
        /// Row of the offending cell
        y: usize,
    },
    /// A climate field is out of range
    InvalidClimate {
        /// Name of the offending field
        field: &'static str,
        /// Supplied value
        value: f64,
    },
    /// Geology carries no minerals at all
    EmptyMineralComposition,
    /// A mineral abundance lies outside `[0, 1]` or is not finite
    InvalidMineralAbundance {
        /// Mineral name as supplied
        mineral: String,
        /// Supplied abundance
        value: f64,
    },
    /// A vegetation field is out of range
    InvalidVegetation {
        /// Name of the offending field
        field: &'static str,
        /// Supplied value
        value: f64,
    },
    /// A dataset query is out of range
    InvalidQuery {
        /// Name of the offending field
        field: &'static str,
        /// Supplied value
        value: f64,
    },
}

impl std::fmt::Display for WeatheringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatheringError::EmptyGrid { width, height } => {
                write!(f, "Terrain grid must be non-empty, got {width}x{height}")
            }
            WeatheringError::DimensionMismatch { expected, actual } => write!(
                f,
                "Elevation data size mismatch: expected {expected} values, got {actual}"
            ),
            WeatheringError::InvalidCellSize(value) => {
                write!(f, "Cell size must be finite and positive, got {value}")
            }
            WeatheringError::NonFiniteElevation { x, y } => {
                write!(f, "Elevation at ({x}, {y}) is not finite")
            }
            WeatheringError::InvalidClimate { field, value } => {
                write!(f, "Climate field '{field}' out of range: {value}")
            }
            WeatheringError::EmptyMineralComposition => {
                write!(f, "Geology mineral composition is empty")
            }
            WeatheringError::InvalidMineralAbundance { mineral, value } => write!(
                f,
                "Mineral '{mineral}' abundance must lie in [0, 1], got {value}"
            ),
            WeatheringError::InvalidVegetation { field, value } => {
                write!(f, "Vegetation field '{field}' out of range: {value}")
            }
            WeatheringError::InvalidQuery { field, value } => {
                write!(f, "Site query field '{field}' out of range: {value}")
            }
        }
    }
}

impl std::error::Error for WeatheringError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = WeatheringError::DimensionMismatch {
            expected: 12,
            actual: 11,
        };
        assert_eq!(
            err.to_string(),
            "Elevation data size mismatch: expected 12 values, got 11"
        );

        let err = WeatheringError::InvalidMineralAbundance {
            mineral: "quartz".to_string(),
            value: 1.5,
        };
        assert!(err.to_string().contains("quartz"));
        assert!(err.to_string().contains("1.5"));
    }
}
