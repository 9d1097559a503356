//! Clinical cut-point tables, one pure function per test.
//!
//! Conditions are checked from most impaired to least impaired; the first
//! unmet condition fixes the score.

use std::time::Duration;

use cmas_core::TestId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lower band edges, in seconds, for holds scored 0–5.
const HOLD_BANDS_SECS: [f64; 5] = [1.0, 10.0, 30.0, 60.0, 120.0];

/// Lower band edges, in seconds, for the arm hold scored 0–4.
const ARM_HOLD_BANDS_SECS: [f64; 4] = [1.0, 10.0, 30.0, 60.0];

/// Number of band edges `seconds` has reached. Non-decreasing in `seconds`.
fn band(seconds: f64, edges: &[f64]) -> u8 {
    edges.iter().take_while(|edge| seconds >= **edge).count() as u8
}

// 1. Head lift (neck flexion)
pub fn score_head_elevation(seconds: f64) -> u8 {
    band(seconds, &HOLD_BANDS_SECS)
}

// 2. Leg raise / touch object
pub fn score_leg_raise(clears_table: bool, touches_object: bool) -> u8 {
    if !clears_table {
        return 0;
    }
    if !touches_object {
        return 1;
    }
    2
}

// 3. Straight leg lift / duration
pub fn score_leg_lift_duration(seconds: f64) -> u8 {
    band(seconds, &HOLD_BANDS_SECS)
}

// 4. Supine to prone
pub fn score_supine_to_prone(
    rolled_side: bool,
    freed_arm: bool,
    reached_prone: bool,
    clean: bool,
) -> u8 {
    if !rolled_side {
        return 0;
    }
    if !freed_arm || !reached_prone {
        return 1;
    }
    if !clean {
        return 2;
    }
    3
}

// 5. Sit-ups, one point per repetition
pub fn score_sit_ups(completed: u32) -> u8 {
    completed.min(6) as u8
}

// 6. Supine to sit
pub fn score_supine_to_sit(success: bool, struggled: bool, duration: Duration) -> u8 {
    if !success {
        return 0;
    }
    if duration > Duration::from_millis(7000) || struggled {
        return 1;
    }
    if duration > Duration::from_millis(4000) {
        return 2;
    }
    3
}

// 7. Arm raise / straighten
pub fn score_arm_raise_height(above_shoulder: bool, above_head: bool, elbows_straight: bool) -> u8 {
    if !above_shoulder {
        return 0;
    }
    if !above_head {
        return 1;
    }
    if !elbows_straight {
        return 2;
    }
    3
}

// 8. Arm raise / duration
pub fn score_arm_raise_duration(seconds: f64) -> u8 {
    band(seconds, &ARM_HOLD_BANDS_SECS)
}

// 9. Floor sit. There is no 1 on this item.
pub fn score_floor_sit(reached_sit: bool, hesitant: bool) -> u8 {
    if !reached_sit {
        return 0;
    }
    if hesitant {
        return 2;
    }
    3
}

// 10. All fours maneuver
pub fn score_all_fours(
    reached_all_fours: bool,
    raised_head: bool,
    crawled: bool,
    leg_lifted: bool,
) -> u8 {
    if !reached_all_fours {
        return 0;
    }
    if !raised_head {
        return 1;
    }
    if !crawled {
        return 2;
    }
    if !leg_lifted {
        return 3;
    }
    4
}

// 11. Floor rise. Chair assistance (1) is not observable from the pose alone.
pub fn score_floor_rise(stood_up: bool, used_hands: bool, struggled: bool) -> u8 {
    if !stood_up {
        return 0;
    }
    if used_hands {
        return 2;
    }
    if struggled {
        return 3;
    }
    4
}

// 12. Chair rise
pub fn score_chair_rise(
    stood_up: bool,
    used_chair_side: bool,
    used_thighs: bool,
    struggled: bool,
) -> u8 {
    if !stood_up {
        return 0;
    }
    if used_chair_side {
        return 1;
    }
    if used_thighs {
        return 2;
    }
    if struggled {
        return 3;
    }
    4
}

// 13. Stool step
pub fn score_stool_step(
    attempted: bool,
    used_support: bool,
    used_thigh: bool,
    completed: bool,
) -> u8 {
    if !attempted {
        return 0;
    }
    if used_support {
        return 1;
    }
    if used_thigh {
        return 2;
    }
    if completed {
        return 3;
    }
    // An unsupported attempt that never completes drops below the thigh
    // branch. Kept as the published rubric has it.
    1
}

// 14. Pick-up object
pub fn score_pick_up_object(
    attempted: bool,
    heavy_support: bool,
    light_support: bool,
    completed: bool,
) -> u8 {
    if !attempted || !completed {
        return 0;
    }
    if heavy_support {
        return 1;
    }
    if light_support {
        return 2;
    }
    3
}

/// Defines the valid range for a sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: u8,
    pub max: u8,
}

impl ScoreRange {
    pub fn for_test(test: TestId) -> Self {
        Self {
            min: 0,
            max: test.max_score(),
        }
    }

    pub fn contains(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// A sub-score entered by hand for validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub test: TestId,
    pub value: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub test: TestId,
    pub value: u8,
    pub expected_range: ScoreRange,
    pub message: String,
}

/// Validate hand-entered scores against each test's range.
pub fn validate_scores(scores: &[ScoreEntry]) -> Vec<ValidationError> {
    scores
        .iter()
        .filter_map(|entry| {
            let range = ScoreRange::for_test(entry.test);
            (!range.contains(entry.value)).then(|| ValidationError {
                test: entry.test,
                value: entry.value,
                expected_range: range,
                message: format!(
                    "{}: score {} is outside range [{}, {}]",
                    entry.test.name(),
                    entry.value,
                    range.min,
                    range.max,
                ),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_counts_reached_edges() {
        assert_eq!(band(0.0, &HOLD_BANDS_SECS), 0);
        assert_eq!(band(45.0, &HOLD_BANDS_SECS), 3);
        assert_eq!(band(f64::NAN, &HOLD_BANDS_SECS), 0);
        assert_eq!(band(f64::INFINITY, &HOLD_BANDS_SECS), 5);
    }

    #[test]
    fn validation_reports_each_bad_entry() {
        let errors = validate_scores(&[
            ScoreEntry {
                test: TestId::LegRaise,
                value: 3,
            },
            ScoreEntry {
                test: TestId::SitUps,
                value: 6,
            },
            ScoreEntry {
                test: TestId::FloorSit,
                value: 9,
            },
        ]);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].test, TestId::LegRaise);
        assert_eq!(errors[0].expected_range, ScoreRange { min: 0, max: 2 });
        assert_eq!(errors[1].message, "Floor Sit: score 9 is outside range [0, 3]");
    }
}
