use std::time::Duration;

use cmas_core::landmark::{LEFT_HIP, LEFT_SHOULDER, RIGHT_HIP, RIGHT_SHOULDER};
use cmas_core::observation::SupineToSitObservation;
use cmas_core::{Frame, TestId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Timing;
use crate::detector::{Detector, Progress, RunEnd};
use crate::freeze::FreezeTracker;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupineToSitConfig {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    pub min_landmarks: usize,
    /// Shoulders within this height of the hips means lying flat.
    pub supine_height: f64,
    /// Shoulders this far above the hips means sitting.
    pub sitting_height: f64,
    pub freeze_epsilon: f64,
    pub freeze_limit: u32,
}

impl Default for SupineToSitConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            timeout_ms: 15_000,
            min_landmarks: 25,
            supine_height: 0.05,
            sitting_height: 0.1,
            freeze_epsilon: 0.005,
            freeze_limit: 5,
        }
    }
}

impl SupineToSitConfig {
    pub fn timing(&self) -> Timing {
        Timing::from_millis(0, self.poll_interval_ms, self.timeout_ms)
    }
}

pub struct SupineToSitDetector {
    config: SupineToSitConfig,
    supine_at: Option<Duration>,
    sat_up_at: Option<Duration>,
    freeze: FreezeTracker,
}

impl SupineToSitDetector {
    pub fn new(config: SupineToSitConfig) -> Self {
        let freeze = FreezeTracker::new(config.freeze_epsilon, config.freeze_limit);
        Self {
            config,
            supine_at: None,
            sat_up_at: None,
            freeze,
        }
    }
}

impl Detector for SupineToSitDetector {
    type Output = SupineToSitObservation;

    fn test(&self) -> TestId {
        TestId::SupineToSit
    }

    fn timing(&self) -> Timing {
        self.config.timing()
    }

    fn min_landmarks(&self) -> usize {
        self.config.min_landmarks
    }

    fn landmarks(&self) -> &'static [usize] {
        &[LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_HIP, RIGHT_HIP]
    }

    fn observe(&mut self, frame: &Frame, at: Duration) -> Progress {
        let shoulder_y = frame.mid_y(LEFT_SHOULDER, RIGHT_SHOULDER);
        // Positive when the shoulders are above the hips on screen.
        let shoulder_height = frame.mid_y(LEFT_HIP, RIGHT_HIP) - shoulder_y;

        if self.supine_at.is_none() && shoulder_height < self.config.supine_height {
            info!(at_ms = at.as_millis() as u64, "supine baseline established");
            self.supine_at = Some(at);
        }

        self.freeze.update(shoulder_y);

        // Sitting only counts as a transition from a seen supine start.
        if self.supine_at.is_some() && shoulder_height > self.config.sitting_height {
            info!(at_ms = at.as_millis() as u64, struggled = self.freeze.is_latched(), "sitting reached");
            self.sat_up_at = Some(at);
            return Progress::Done;
        }
        Progress::Continue
    }

    fn finish(self, _end: RunEnd) -> SupineToSitObservation {
        let duration = self
            .sat_up_at
            .zip(self.supine_at)
            .map(|(sat, supine)| sat.saturating_sub(supine));
        SupineToSitObservation {
            transitioned: self.sat_up_at.is_some(),
            struggled: self.freeze.is_latched(),
            duration,
        }
    }
}
