//! Evaluator error types.

use thiserror::Error;

use helmi_hal::HalError;
use helmi_ir::IrError;

/// Result type for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that can occur while running or scoring experiments.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Malformed input: zero shots, wrong oracle width, misaligned
    /// histogram and target.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A backend call failed. Never retried here.
    #[error("Backend failure on circuit {index}: {source}")]
    BackendFailure {
        /// Position of the failing circuit in the submitted sequence.
        index: usize,
        /// What the backend reported.
        #[source]
        source: HalError,
    },

    /// A required endpoint or credential is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl EvalError {
    /// Wrap a backend error with the index of the circuit that caused it.
    pub fn backend(index: usize, source: HalError) -> Self {
        match source {
            HalError::Configuration(msg) => EvalError::Configuration(msg),
            source => EvalError::BackendFailure { index, source },
        }
    }

    /// Wrap an error from a batch submission.
    ///
    /// A [`HalError::BatchItem`] names the failing circuit itself; any other
    /// error failed the whole submission and is reported against circuit 0.
    pub fn batch(source: HalError) -> Self {
        match source {
            HalError::BatchItem { index, source } => EvalError::backend(index, *source),
            source => EvalError::backend(0, source),
        }
    }
}

impl From<HalError> for EvalError {
    fn from(e: HalError) -> Self {
        EvalError::backend(0, e)
    }
}

impl From<IrError> for EvalError {
    fn from(e: IrError) -> Self {
        EvalError::InvalidArgument(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_is_not_a_backend_failure() {
        let err = EvalError::backend(3, HalError::Configuration("missing url".into()));
        assert!(matches!(err, EvalError::Configuration(_)));
    }

    #[test]
    fn test_backend_failure_carries_index() {
        let err = EvalError::backend(3, HalError::JobFailed("timeout".into()));
        assert!(matches!(err, EvalError::BackendFailure { index: 3, .. }));
        assert!(err.to_string().contains("circuit 3"));
    }

    #[test]
    fn test_batch_error_unwraps_item_index() {
        let tagged = HalError::batch_item(2, HalError::InvalidCircuit("off the map".into()));
        match EvalError::batch(tagged) {
            EvalError::BackendFailure { index, source } => {
                assert_eq!(index, 2);
                assert!(matches!(source, HalError::InvalidCircuit(_)));
            }
            other => panic!("unexpected error: {other}"),
        }

        let whole = EvalError::batch(HalError::SubmissionFailed("queue full".into()));
        assert!(matches!(whole, EvalError::BackendFailure { index: 0, .. }));

        let config = HalError::batch_item(1, HalError::Configuration("no url".into()));
        assert!(matches!(EvalError::batch(config), EvalError::Configuration(_)));
    }
}
