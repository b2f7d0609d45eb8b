// Error types for significance estimation

use thiserror::Error;

/// Errors that can occur while estimating statistical significance
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignificanceError {
    /// A sample cannot support a t-test (too few observations, non-finite
    /// statistics, negative standard deviation)
    #[error("Invalid sample: {reason}")]
    InvalidSample { reason: String },

    /// Pooled standard deviation is zero, so the t-statistic is undefined
    #[error("Pooled standard deviation is zero: insufficient variance to determine significance")]
    ZeroVariance,

    #[error("Confidence level must be strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),

    #[error("Failed to construct distribution: {0}")]
    Distribution(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SignificanceError {
    pub(crate) fn invalid_sample(reason: impl Into<String>) -> Self {
        Self::InvalidSample {
            reason: reason.into(),
        }
    }
}

/// Result type for significance estimation
pub type Result<T> = std::result::Result<T, SignificanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_sample_message() {
        let err = SignificanceError::invalid_sample("sample_size must be >= 2, got 1");
        assert_eq!(
            err.to_string(),
            "Invalid sample: sample_size must be >= 2, got 1"
        );
    }

    #[test]
    fn test_invalid_confidence_message() {
        let err = SignificanceError::InvalidConfidence(1.5);
        assert!(err.to_string().contains("1.5"));
    }
}
