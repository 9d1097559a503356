use thiserror::Error;

use crate::scoring::ValidationError;

#[derive(Debug, Error)]
pub enum RubricError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("duplicate score for {0}")]
    Duplicate(cmas_core::TestId),

    #[error(transparent)]
    Core(#[from] cmas_core::CoreError),
}
