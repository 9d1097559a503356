use std::time::Duration;

use cmas_core::landmark::{
    LEFT_ANKLE, LEFT_HIP, LEFT_KNEE, LEFT_WRIST, RIGHT_ANKLE, RIGHT_HIP, RIGHT_KNEE, RIGHT_WRIST,
};
use cmas_core::observation::StoolStepObservation;
use cmas_core::{Frame, TestId};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::hand_on_knee;
use crate::config::Timing;
use crate::detector::{Detector, Progress, RunEnd};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoolStepConfig {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    pub min_landmarks: usize,
    /// Ankle height difference that counts as lifting a foot.
    pub step_height: f64,
    pub thigh_tolerance: f64,
    /// An ankle higher on screen than this means the foot is on the stool.
    pub on_stool_y: f64,
}

impl Default for StoolStepConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            timeout_ms: 15_000,
            min_landmarks: 29,
            step_height: 0.15,
            thigh_tolerance: 0.1,
            on_stool_y: 0.6,
        }
    }
}

impl StoolStepConfig {
    pub fn timing(&self) -> Timing {
        Timing::from_millis(0, self.poll_interval_ms, self.timeout_ms)
    }
}

pub struct StoolStepDetector {
    config: StoolStepConfig,
    observation: StoolStepObservation,
}

impl StoolStepDetector {
    pub fn new(config: StoolStepConfig) -> Self {
        Self {
            config,
            observation: StoolStepObservation::default(),
        }
    }
}

impl Detector for StoolStepDetector {
    type Output = StoolStepObservation;

    fn test(&self) -> TestId {
        TestId::StoolStep
    }

    fn timing(&self) -> Timing {
        self.config.timing()
    }

    fn min_landmarks(&self) -> usize {
        self.config.min_landmarks
    }

    fn landmarks(&self) -> &'static [usize] {
        &[
            LEFT_WRIST,
            RIGHT_WRIST,
            LEFT_HIP,
            RIGHT_HIP,
            LEFT_KNEE,
            RIGHT_KNEE,
            LEFT_ANKLE,
            RIGHT_ANKLE,
        ]
    }

    fn observe(&mut self, frame: &Frame, at: Duration) -> Progress {
        let obs = &mut self.observation;
        let (left_ankle_y, right_ankle_y) = (frame[LEFT_ANKLE].y, frame[RIGHT_ANKLE].y);

        if !obs.attempted && (left_ankle_y - right_ankle_y).abs() > self.config.step_height {
            info!(at_ms = at.as_millis() as u64, "step attempt detected");
            obs.attempted = true;
        }

        let tolerance = self.config.thigh_tolerance;
        if hand_on_knee(frame, LEFT_WRIST, LEFT_KNEE, tolerance)
            || hand_on_knee(frame, RIGHT_WRIST, RIGHT_KNEE, tolerance)
        {
            obs.used_thigh = true;
        }

        let hip_y = frame.mid_y(LEFT_HIP, RIGHT_HIP);
        if frame[LEFT_WRIST].y > hip_y || frame[RIGHT_WRIST].y > hip_y {
            obs.used_support = true;
        }

        if obs.attempted && left_ankle_y.min(right_ankle_y) < self.config.on_stool_y {
            info!(at_ms = at.as_millis() as u64, "step completed");
            obs.completed = true;
            return Progress::Done;
        }
        Progress::Continue
    }

    fn finish(self, _end: RunEnd) -> StoolStepObservation {
        self.observation
    }
}
