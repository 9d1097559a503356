use thiserror::Error;

use crate::test_id::TestId;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown test: {0}")]
    UnknownTest(String),

    #[error("{test}: score {value} is outside range [0, {max}]")]
    ScoreOutOfRange { test: TestId, value: u8, max: u8 },
}
