//! Arm raise graded from a single frame.
//!
//! Every usable frame is graded on its own. The first frame that grades
//! above "no lift" settles the test; nothing is accumulated across frames.

use std::time::Duration;

use cmas_core::landmark::{
    LEFT_ELBOW, LEFT_SHOULDER, LEFT_WRIST, RIGHT_ELBOW, RIGHT_SHOULDER, RIGHT_WRIST,
};
use cmas_core::observation::{ArmRaiseGrade, ArmRaiseObservation};
use cmas_core::{Frame, TestId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Timing;
use crate::detector::{Detector, Progress, RunEnd};
use crate::geometry::angle;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmRaiseConfig {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    pub min_landmarks: usize,
    /// Fixed image line a wrist must rise above to count as over the head.
    pub head_line_y: f64,
    /// Elbow angle, in degrees, above which the arm counts as straight.
    pub straight_elbow_deg: f64,
}

impl Default for ArmRaiseConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            timeout_ms: 10_000,
            min_landmarks: 17,
            head_line_y: 0.3,
            straight_elbow_deg: 160.0,
        }
    }
}

impl ArmRaiseConfig {
    pub fn timing(&self) -> Timing {
        Timing::from_millis(0, self.poll_interval_ms, self.timeout_ms)
    }
}

/// Per-side predicates for one arm.
#[derive(Debug, Clone, Copy)]
struct Arm {
    above_shoulder: bool,
    above_head: bool,
    straight: bool,
}

pub struct ArmRaiseDetector {
    config: ArmRaiseConfig,
    last: ArmRaiseObservation,
}

impl ArmRaiseDetector {
    pub fn new(config: ArmRaiseConfig) -> Self {
        Self {
            config,
            last: ArmRaiseObservation::default(),
        }
    }

    fn arm(&self, frame: &Frame, shoulder: usize, elbow: usize, wrist: usize) -> Arm {
        let wrist_y = frame[wrist].y;
        Arm {
            above_shoulder: wrist_y < frame[shoulder].y,
            above_head: wrist_y < self.config.head_line_y,
            straight: angle(&frame[shoulder], &frame[elbow], &frame[wrist])
                > self.config.straight_elbow_deg,
        }
    }

    /// Grade one frame.
    pub fn assess(&self, frame: &Frame) -> ArmRaiseObservation {
        let left = self.arm(frame, LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST);
        let right = self.arm(frame, RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST);

        ArmRaiseObservation {
            above_shoulder: left.above_shoulder || right.above_shoulder,
            above_head: left.above_head || right.above_head,
            fully_extended: left.above_head
                && right.above_head
                && left.straight
                && right.straight,
        }
    }
}

impl Detector for ArmRaiseDetector {
    type Output = ArmRaiseObservation;

    fn test(&self) -> TestId {
        TestId::ArmRaise
    }

    fn timing(&self) -> Timing {
        self.config.timing()
    }

    fn min_landmarks(&self) -> usize {
        self.config.min_landmarks
    }

    fn landmarks(&self) -> &'static [usize] {
        &[
            LEFT_SHOULDER,
            RIGHT_SHOULDER,
            LEFT_ELBOW,
            RIGHT_ELBOW,
            LEFT_WRIST,
            RIGHT_WRIST,
        ]
    }

    fn observe(&mut self, frame: &Frame, at: Duration) -> Progress {
        self.last = self.assess(frame);
        let grade = self.last.grade();
        if grade > ArmRaiseGrade::NoLift {
            info!(?grade, at_ms = at.as_millis() as u64, "arm raise graded");
            return Progress::Done;
        }
        Progress::Continue
    }

    fn finish(self, _end: RunEnd) -> ArmRaiseObservation {
        self.last
    }
}
