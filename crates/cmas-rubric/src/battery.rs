use cmas_core::{BatteryResult, SubScore};

use crate::error::RubricError;
use crate::scoring::{validate_scores, ScoreEntry};

/// Battery total: the plain sum of all fourteen sub-scores.
pub fn total(subscores: &[SubScore; 14]) -> u32 {
    subscores.iter().copied().map(u32::from).sum()
}

/// Total of a result, or `None` while any test is still unscored.
pub fn battery_total(result: &BatteryResult) -> Option<u32> {
    result.to_array().map(|scores| total(&scores))
}

/// Build a result from hand-entered scores.
///
/// Fails on the first out-of-range entry or on a test entered twice.
pub fn collect_entries(entries: &[ScoreEntry]) -> Result<BatteryResult, RubricError> {
    if let Some(error) = validate_scores(entries).into_iter().next() {
        return Err(error.into());
    }

    let mut result = BatteryResult::new();
    for entry in entries {
        if result.record(entry.test, SubScore::new(entry.value))?.is_some() {
            return Err(RubricError::Duplicate(entry.test));
        }
    }
    Ok(result)
}
