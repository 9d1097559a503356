use std::time::Duration;

use cmas_core::landmark::{LEFT_HIP, LEFT_KNEE, LEFT_WRIST, RIGHT_HIP, RIGHT_KNEE, RIGHT_WRIST};
use cmas_core::observation::ChairRiseObservation;
use cmas_core::{Frame, TestId};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::hand_on_knee;
use crate::config::Timing;
use crate::detector::{Detector, Progress, RunEnd};
use crate::freeze::FreezeTracker;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChairRiseConfig {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    pub min_landmarks: usize,
    /// Hip height at which the subject is seated in the chair.
    pub seated_hip_y: f64,
    pub qualifying_start_y: f64,
    pub standing_hip_y: f64,
    /// Horizontal wrist-to-knee distance for a hand resting on the thigh.
    pub thigh_tolerance: f64,
    /// Wrist this far outside its hip means pushing off the chair side.
    pub chair_side_margin: f64,
    pub freeze_epsilon: f64,
    pub freeze_limit: u32,
}

impl Default for ChairRiseConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            timeout_ms: 15_000,
            min_landmarks: 29,
            seated_hip_y: 0.75,
            qualifying_start_y: 0.7,
            standing_hip_y: 0.45,
            thigh_tolerance: 0.1,
            chair_side_margin: 0.15,
            freeze_epsilon: 0.005,
            freeze_limit: 5,
        }
    }
}

impl ChairRiseConfig {
    pub fn timing(&self) -> Timing {
        Timing::from_millis(0, self.poll_interval_ms, self.timeout_ms)
    }
}

pub struct ChairRiseDetector {
    config: ChairRiseConfig,
    start_hip_y: Option<f64>,
    observation: ChairRiseObservation,
    freeze: FreezeTracker,
}

impl ChairRiseDetector {
    pub fn new(config: ChairRiseConfig) -> Self {
        let freeze = FreezeTracker::new(config.freeze_epsilon, config.freeze_limit);
        Self {
            config,
            start_hip_y: None,
            observation: ChairRiseObservation::default(),
            freeze,
        }
    }
}

impl Detector for ChairRiseDetector {
    type Output = ChairRiseObservation;

    fn test(&self) -> TestId {
        TestId::ChairRise
    }

    fn timing(&self) -> Timing {
        self.config.timing()
    }

    fn min_landmarks(&self) -> usize {
        self.config.min_landmarks
    }

    fn landmarks(&self) -> &'static [usize] {
        &[LEFT_WRIST, RIGHT_WRIST, LEFT_HIP, RIGHT_HIP, LEFT_KNEE, RIGHT_KNEE]
    }

    fn observe(&mut self, frame: &Frame, at: Duration) -> Progress {
        let hip_y = frame.mid_y(LEFT_HIP, RIGHT_HIP);

        if self.start_hip_y.is_none() && hip_y > self.config.seated_hip_y {
            info!(hip_y, "seated start recorded");
            self.start_hip_y = Some(hip_y);
        }

        let tolerance = self.config.thigh_tolerance;
        if !self.observation.used_thighs
            && (hand_on_knee(frame, LEFT_WRIST, LEFT_KNEE, tolerance)
                || hand_on_knee(frame, RIGHT_WRIST, RIGHT_KNEE, tolerance))
        {
            info!(at_ms = at.as_millis() as u64, "hands on thighs");
            self.observation.used_thighs = true;
        }

        let margin = self.config.chair_side_margin;
        if !self.observation.used_chair_side
            && (frame[LEFT_WRIST].x < frame[LEFT_HIP].x - margin
                || frame[RIGHT_WRIST].x > frame[RIGHT_HIP].x + margin)
        {
            info!(at_ms = at.as_millis() as u64, "pushed off the chair side");
            self.observation.used_chair_side = true;
        }

        let qualified = self
            .start_hip_y
            .is_some_and(|start| start > self.config.qualifying_start_y);
        if qualified && hip_y < self.config.standing_hip_y {
            info!(at_ms = at.as_millis() as u64, struggled = self.freeze.is_latched(), "stood up");
            self.observation.stood_up = true;
            return Progress::Done;
        }

        self.freeze.update(hip_y);
        Progress::Continue
    }

    fn finish(self, _end: RunEnd) -> ChairRiseObservation {
        ChairRiseObservation {
            struggled: self.freeze.is_latched(),
            ..self.observation
        }
    }
}
