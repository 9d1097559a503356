use std::time::Duration;

use cmas_core::landmark::{LEFT_HIP, RIGHT_HIP};
use cmas_core::observation::FloorSitObservation;
use cmas_core::{Frame, TestId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Timing;
use crate::detector::{Detector, Progress, RunEnd};
use crate::freeze::FreezeTracker;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorSitConfig {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    pub min_landmarks: usize,
    /// Hip height (low on screen) at which the subject is seated on the floor.
    pub seated_hip_y: f64,
    pub freeze_epsilon: f64,
    /// Hesitation latches once more than this many still samples accrue.
    pub freeze_limit: u32,
}

impl Default for FloorSitConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            timeout_ms: 15_000,
            min_landmarks: 25,
            seated_hip_y: 0.8,
            freeze_epsilon: 0.005,
            freeze_limit: 4,
        }
    }
}

impl FloorSitConfig {
    pub fn timing(&self) -> Timing {
        Timing::from_millis(0, self.poll_interval_ms, self.timeout_ms)
    }
}

pub struct FloorSitDetector {
    config: FloorSitConfig,
    reached_sit: bool,
    freeze: FreezeTracker,
}

impl FloorSitDetector {
    pub fn new(config: FloorSitConfig) -> Self {
        let freeze = FreezeTracker::new(config.freeze_epsilon, config.freeze_limit);
        Self {
            config,
            reached_sit: false,
            freeze,
        }
    }
}

impl Detector for FloorSitDetector {
    type Output = FloorSitObservation;

    fn test(&self) -> TestId {
        TestId::FloorSit
    }

    fn timing(&self) -> Timing {
        self.config.timing()
    }

    fn min_landmarks(&self) -> usize {
        self.config.min_landmarks
    }

    fn landmarks(&self) -> &'static [usize] {
        &[LEFT_HIP, RIGHT_HIP]
    }

    fn observe(&mut self, frame: &Frame, at: Duration) -> Progress {
        let hip_y = frame.mid_y(LEFT_HIP, RIGHT_HIP);

        if hip_y > self.config.seated_hip_y {
            info!(at_ms = at.as_millis() as u64, hesitant = self.freeze.is_latched(), "seated on floor");
            self.reached_sit = true;
            return Progress::Done;
        }

        self.freeze.update(hip_y);
        Progress::Continue
    }

    fn finish(self, _end: RunEnd) -> FloorSitObservation {
        FloorSitObservation {
            reached_sit: self.reached_sit,
            hesitant: self.freeze.is_latched(),
        }
    }
}
