use std::time::Duration;

use cmas_core::landmark::{
    LEFT_ANKLE, LEFT_KNEE, LEFT_WRIST, RIGHT_ANKLE, RIGHT_KNEE, RIGHT_WRIST,
};
use cmas_core::observation::PickUpObservation;
use cmas_core::{Frame, TestId};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::hand_on_knee;
use crate::config::Timing;
use crate::detector::{Detector, Progress, RunEnd};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickUpConfig {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    pub min_landmarks: usize,
    /// A wrist lower than this is reaching for the floor.
    pub reach_y: f64,
    /// A wrist this far below the lower ankle is braced on the floor.
    pub floor_margin: f64,
    pub thigh_tolerance: f64,
    /// Both wrists back above this means the object was lifted.
    pub upright_y: f64,
}

impl Default for PickUpConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            timeout_ms: 15_000,
            min_landmarks: 29,
            reach_y: 0.8,
            floor_margin: 0.05,
            thigh_tolerance: 0.1,
            upright_y: 0.6,
        }
    }
}

impl PickUpConfig {
    pub fn timing(&self) -> Timing {
        Timing::from_millis(0, self.poll_interval_ms, self.timeout_ms)
    }
}

pub struct PickUpDetector {
    config: PickUpConfig,
    observation: PickUpObservation,
}

impl PickUpDetector {
    pub fn new(config: PickUpConfig) -> Self {
        Self {
            config,
            observation: PickUpObservation::default(),
        }
    }
}

impl Detector for PickUpDetector {
    type Output = PickUpObservation;

    fn test(&self) -> TestId {
        TestId::PickUpObject
    }

    fn timing(&self) -> Timing {
        self.config.timing()
    }

    fn min_landmarks(&self) -> usize {
        self.config.min_landmarks
    }

    fn landmarks(&self) -> &'static [usize] {
        &[LEFT_WRIST, RIGHT_WRIST, LEFT_KNEE, RIGHT_KNEE, LEFT_ANKLE, RIGHT_ANKLE]
    }

    fn observe(&mut self, frame: &Frame, at: Duration) -> Progress {
        let obs = &mut self.observation;
        let (left_y, right_y) = (frame[LEFT_WRIST].y, frame[RIGHT_WRIST].y);
        let lowest_hand = left_y.max(right_y);
        let floor_y = frame[LEFT_ANKLE].y.max(frame[RIGHT_ANKLE].y);

        if !obs.attempted && lowest_hand > self.config.reach_y {
            info!(at_ms = at.as_millis() as u64, "reach attempt detected");
            obs.attempted = true;
        }

        if lowest_hand > floor_y + self.config.floor_margin {
            obs.heavy_support = true;
        }

        let tolerance = self.config.thigh_tolerance;
        if hand_on_knee(frame, LEFT_WRIST, LEFT_KNEE, tolerance)
            || hand_on_knee(frame, RIGHT_WRIST, RIGHT_KNEE, tolerance)
        {
            obs.light_support = true;
        }

        if obs.attempted && left_y < self.config.upright_y && right_y < self.config.upright_y {
            info!(at_ms = at.as_millis() as u64, "object picked up");
            obs.completed = true;
            return Progress::Done;
        }
        Progress::Continue
    }

    fn finish(self, _end: RunEnd) -> PickUpObservation {
        self.observation
    }
}
