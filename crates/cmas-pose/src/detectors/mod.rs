//! One state machine per test.
//!
//! Every detector is created fresh for a single run, owns its own latches
//! and freeze tracker, and is consumed by [`Detector::finish`](crate::Detector::finish).

pub mod all_fours;
pub mod arm_raise;
pub mod chair_rise;
pub mod floor_rise;
pub mod floor_sit;
pub mod hold;
pub mod leg_raise;
pub mod pick_up;
pub mod sit_ups;
pub mod stool_step;
pub mod supine_to_prone;
pub mod supine_to_sit;

use cmas_core::landmark::{RIGHT_ANKLE, RIGHT_FOOT_INDEX};
use cmas_core::Frame;

use crate::geometry::euclidean;

/// Hand braced at the knee: wrist at or below the knee on screen and
/// horizontally within `tolerance` of it.
pub(crate) fn hand_on_knee(frame: &Frame, wrist: usize, knee: usize, tolerance: f64) -> bool {
    frame[wrist].y > frame[knee].y && (frame[wrist].x - frame[knee].x).abs() < tolerance
}

/// Ankle-to-toe length of the tracked foot, the body-relative unit for
/// leg lift heights.
pub(crate) fn foot_length(frame: &Frame) -> f64 {
    euclidean(&frame[RIGHT_ANKLE], &frame[RIGHT_FOOT_INDEX])
}
