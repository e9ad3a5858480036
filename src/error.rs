//! Error types for dataset preparation.

use thiserror::Error;

/// Result type alias for dataset preparation.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Errors that can occur while shuffling, splitting or standardizing data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrepError {
    /// Features and labels disagree on the number of samples.
    #[error("shape mismatch: features have {features} samples, labels have {labels}")]
    ShapeMismatch {
        /// Rows in the feature matrix.
        features: usize,
        /// Leading length of the label array.
        labels: usize,
    },

    /// Label array is zero-dimensional.
    #[error("label array has no sample axis")]
    NoSampleAxis,

    /// Statistics requested over an empty matrix.
    #[error("input has no samples")]
    EmptyInput,

    /// Column count differs from the fitted statistics.
    #[error("feature mismatch: fitted on {expected} columns, got {actual}")]
    FeatureMismatch {
        /// Columns seen during fit.
        expected: usize,
        /// Columns in the input.
        actual: usize,
    },

    /// Transform requested before any fit.
    #[error("standardizer not fitted, call normalize() or fit() first")]
    NotFitted,

    /// A column has zero standard deviation (strict mode only).
    #[error("column {column} has zero variance")]
    ZeroVariance {
        /// Index of the offending column.
        column: usize,
    },
}

impl PrepError {
    /// Creates a shape mismatch error.
    #[must_use]
    pub const fn shape_mismatch(features: usize, labels: usize) -> Self {
        Self::ShapeMismatch { features, labels }
    }

    /// Creates a feature mismatch error.
    #[must_use]
    pub const fn feature_mismatch(expected: usize, actual: usize) -> Self {
        Self::FeatureMismatch { expected, actual }
    }

    /// Creates a zero variance error.
    #[must_use]
    pub const fn zero_variance(column: usize) -> Self {
        Self::ZeroVariance { column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PrepError::shape_mismatch(10, 9);
        let msg = format!("{err}");
        assert!(msg.contains("10"));
        assert!(msg.contains("9"));

        let err = PrepError::feature_mismatch(3, 2);
        assert!(format!("{err}").contains("fitted on 3"));

        let err = PrepError::zero_variance(4);
        assert!(format!("{err}").contains("column 4"));

        assert!(format!("{}", PrepError::NotFitted).contains("not fitted"));
    }
}
