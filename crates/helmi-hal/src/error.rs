//! Error types for the HAL crate.

use thiserror::Error;

/// Errors reported by a backend capability.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Backend is not available.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Job submission failed.
    #[error("Job submission failed: {0}")]
    SubmissionFailed(String),

    /// Job execution failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Invalid circuit.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Circuit exceeds backend capabilities.
    #[error("Circuit exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    /// Unsupported feature.
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),

    /// One circuit of a batch submission failed.
    #[error("Batch circuit {index} failed: {source}")]
    BatchItem {
        /// Position of the failing circuit in the submitted slice.
        index: usize,
        /// What went wrong with that circuit.
        #[source]
        source: Box<HalError>,
    },
}

impl HalError {
    /// Tag an error with the batch position of the circuit that caused it.
    pub fn batch_item(index: usize, source: HalError) -> Self {
        HalError::BatchItem {
            index,
            source: Box::new(source),
        }
    }
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_item_wraps_source() {
        let err = HalError::batch_item(2, HalError::InvalidCircuit("off the map".into()));
        assert!(err.to_string().contains("Batch circuit 2"));
        match err {
            HalError::BatchItem { index, source } => {
                assert_eq!(index, 2);
                assert!(matches!(*source, HalError::InvalidCircuit(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
