use std::time::Duration;

use cmas_core::landmark::{LEFT_HIP, LEFT_KNEE, LEFT_WRIST, RIGHT_HIP, RIGHT_KNEE, RIGHT_WRIST};
use cmas_core::observation::FloorRiseObservation;
use cmas_core::{Frame, TestId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Timing;
use crate::detector::{Detector, Progress, RunEnd};
use crate::freeze::FreezeTracker;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorRiseConfig {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    pub min_landmarks: usize,
    /// Hip height at which the subject is seated on the floor.
    pub seated_hip_y: f64,
    /// A start seated lower than this qualifies a later stand.
    pub qualifying_start_y: f64,
    /// Hands below the knees only count while the hips are still below this.
    pub low_hip_y: f64,
    /// Hip height at which the subject is standing.
    pub standing_hip_y: f64,
    pub freeze_epsilon: f64,
    pub freeze_limit: u32,
}

impl Default for FloorRiseConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            timeout_ms: 15_000,
            min_landmarks: 29,
            seated_hip_y: 0.8,
            qualifying_start_y: 0.7,
            low_hip_y: 0.6,
            standing_hip_y: 0.45,
            freeze_epsilon: 0.005,
            freeze_limit: 5,
        }
    }
}

impl FloorRiseConfig {
    pub fn timing(&self) -> Timing {
        Timing::from_millis(0, self.poll_interval_ms, self.timeout_ms)
    }
}

pub struct FloorRiseDetector {
    config: FloorRiseConfig,
    start_hip_y: Option<f64>,
    stood_up: bool,
    used_hands: bool,
    freeze: FreezeTracker,
}

impl FloorRiseDetector {
    pub fn new(config: FloorRiseConfig) -> Self {
        let freeze = FreezeTracker::new(config.freeze_epsilon, config.freeze_limit);
        Self {
            config,
            start_hip_y: None,
            stood_up: false,
            used_hands: false,
            freeze,
        }
    }
}

impl Detector for FloorRiseDetector {
    type Output = FloorRiseObservation;

    fn test(&self) -> TestId {
        TestId::FloorRise
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
        let knee_y = frame.mid_y(LEFT_KNEE, RIGHT_KNEE);

        if self.start_hip_y.is_none() && hip_y > self.config.seated_hip_y {
            info!(hip_y, "seated start recorded");
            self.start_hip_y = Some(hip_y);
        }

        if !self.used_hands
            && hip_y > self.config.low_hip_y
            && (frame[LEFT_WRIST].y > knee_y || frame[RIGHT_WRIST].y > knee_y)
        {
            info!(at_ms = at.as_millis() as u64, "hands used to push up");
            self.used_hands = true;
        }

        self.freeze.update(hip_y);

        let qualified = self
            .start_hip_y
            .is_some_and(|start| start > self.config.qualifying_start_y);
        if qualified && hip_y < self.config.standing_hip_y {
            info!(at_ms = at.as_millis() as u64, struggled = self.freeze.is_latched(), "stood up");
            self.stood_up = true;
            return Progress::Done;
        }
        Progress::Continue
    }

    fn finish(self, _end: RunEnd) -> FloorRiseObservation {
        FloorRiseObservation {
            stood_up: self.stood_up,
            used_hands: self.used_hands,
            struggled: self.freeze.is_latched(),
        }
    }
}
