//! Error types for descent optimization.
//!
//! Reaching the iteration cap is not an error: it is reported as a
//! [`ConvergenceStatus`](crate::convergence::ConvergenceStatus) on the
//! result. Errors are reserved for caller contract violations that can be
//! detected before or during a run.

use thiserror::Error;

/// Errors that can occur while configuring or running an optimizer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizerError {
    /// Invalid optimizer configuration.
    ///
    /// This error occurs when the optimizer is configured with invalid
    /// parameters (e.g., non-positive tolerance, momentum decay outside (0, 1)).
    #[error("Invalid optimizer configuration: {reason} ({parameter} = {value})")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// Dimension mismatch between vectors.
    ///
    /// Raised when a supplied gradient returns a vector whose length differs
    /// from the dimension of the point it was evaluated at.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },
}

impl OptimizerError {
    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: ToString,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }
}

/// Result type alias for optimizer operations.
pub type OptimizerResult<T> = std::result::Result<T, OptimizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimizer_error_creation() {
        let err = OptimizerError::invalid_configuration("must be positive", "tolerance_r", -0.1);
        assert!(matches!(err, OptimizerError::InvalidConfiguration { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid optimizer configuration: must be positive (tolerance_r = -0.1)"
        );

        let err = OptimizerError::dimension_mismatch(3, 4);
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3, got 4");
    }

    #[test]
    fn test_optimizer_error_context() {
        let err = OptimizerError::invalid_configuration("must lie in (0, 1)", "beta1", 1.5);

        if let OptimizerError::InvalidConfiguration {
            reason,
            parameter,
            value,
        } = err
        {
            assert_eq!(reason, "must lie in (0, 1)");
            assert_eq!(parameter, "beta1");
            assert_eq!(value, "1.5");
        } else {
            panic!("Expected InvalidConfiguration variant");
        }
    }
}
