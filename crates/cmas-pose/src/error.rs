use cmas_core::TestId;
use thiserror::Error;

/// Configuration and invariant failures. Sensor gaps and timeouts are not
/// errors and never appear here.
#[derive(Debug, Error)]
pub enum PoseError {
    #[error("{test}: landmark {index} is outside the {min_landmarks}-point frame minimum")]
    LandmarkOutOfRange {
        test: TestId,
        index: usize,
        min_landmarks: usize,
    },

    #[error("{test}: {field} must be greater than zero")]
    InvalidTiming { test: TestId, field: &'static str },

    #[error("failed to read frame recording: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] cmas_core::CoreError),
}
