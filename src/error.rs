//! Error types for the Hopfield crate.
//!
//! This module provides a unified error type for training, relaxation,
//! persistence and pattern decoding, using the `thiserror` crate.

use thiserror::Error;

/// The main error type for Hopfield operations.
///
/// Cancellation of a run is not an error; it is reported through
/// [`RunOutcome::converged`](crate::RunOutcome) instead.
#[derive(Error, Debug)]
pub enum HopfieldError {
    /// Pattern, probe or state length does not match the network size
    #[error("Dimension mismatch: expected {expected} neurons, got {actual}")]
    DimensionMismatch {
        /// Number of neurons the network was built for
        expected: usize,
        /// Length of the offending vector
        actual: usize,
    },

    /// Image width or height differs from the network's pattern geometry
    #[error("Image size mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    ImageSizeMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    /// No training patterns were supplied
    #[error("Empty training set - at least one pattern is required")]
    EmptyTrainingSet,

    /// A state element outside {+1, -1}
    #[error("Invalid state value {value} at index {index} (expected +1 or -1)")]
    InvalidStateValue {
        /// Position of the bad element
        index: usize,
        /// The value found there
        value: f64,
    },

    /// `run()` was called before a successful `train()`
    #[error("Network not trained - call train() before run()")]
    NotTrained,

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Index out of bounds
    #[error("Index out of bounds: index {index}, length {length}")]
    IndexOutOfBounds {
        /// The index that was accessed
        index: usize,
        /// The valid length
        length: usize,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error occurred
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Image decoding or encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

/// A specialized `Result` type for Hopfield operations.
pub type Result<T> = std::result::Result<T, HopfieldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HopfieldError::NotTrained;
        assert_eq!(
            err.to_string(),
            "Network not trained - call train() before run()"
        );

        let err = HopfieldError::DimensionMismatch {
            expected: 4096,
            actual: 16,
        };
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected 4096 neurons, got 16"
        );

        let err = HopfieldError::ImageSizeMismatch {
            expected_width: 4,
            expected_height: 4,
            width: 2,
            height: 8,
        };
        assert_eq!(
            err.to_string(),
            "Image size mismatch: expected 4x4, got 2x8"
        );

        let err = HopfieldError::InvalidStateValue {
            index: 3,
            value: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid state value 0 at index 3 (expected +1 or -1)"
        );
    }

    #[test]
    fn test_io_conversion() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))?;
            Ok(())
        }

        assert!(matches!(fails(), Err(HopfieldError::Io(_))));
    }
}
