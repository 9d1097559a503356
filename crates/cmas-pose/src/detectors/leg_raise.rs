use std::time::Duration;

use cmas_core::landmark::{RIGHT_ANKLE, RIGHT_FOOT_INDEX};
use cmas_core::observation::LegRaiseObservation;
use cmas_core::{Frame, TestId};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::foot_length;
use crate::config::Timing;
use crate::detector::{Detector, Progress, RunEnd};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LegRaiseConfig {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    pub min_landmarks: usize,
    /// Ankle rise that counts as clearing the table.
    pub clear_rise: f64,
    /// Ankle rise, in foot lengths, that counts as touching the target.
    pub target_foot_lengths: f64,
}

impl Default for LegRaiseConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            timeout_ms: 10_000,
            min_landmarks: 33,
            clear_rise: 0.05,
            target_foot_lengths: 2.0,
        }
    }
}

impl LegRaiseConfig {
    pub fn timing(&self) -> Timing {
        Timing::from_millis(0, self.poll_interval_ms, self.timeout_ms)
    }
}

/// Calibration from the first usable frame.
#[derive(Debug, Clone, Copy)]
struct Baseline {
    rest_y: f64,
    foot_length: f64,
}

pub struct LegRaiseDetector {
    config: LegRaiseConfig,
    baseline: Option<Baseline>,
    clears_table: bool,
    touches_target: bool,
}

impl LegRaiseDetector {
    pub fn new(config: LegRaiseConfig) -> Self {
        Self {
            config,
            baseline: None,
            clears_table: false,
            touches_target: false,
        }
    }
}

impl Detector for LegRaiseDetector {
    type Output = LegRaiseObservation;

    fn test(&self) -> TestId {
        TestId::LegRaise
    }

    fn timing(&self) -> Timing {
        self.config.timing()
    }

    fn min_landmarks(&self) -> usize {
        self.config.min_landmarks
    }

    fn landmarks(&self) -> &'static [usize] {
        &[RIGHT_ANKLE, RIGHT_FOOT_INDEX]
    }

    fn observe(&mut self, frame: &Frame, _at: Duration) -> Progress {
        let Some(baseline) = self.baseline else {
            let baseline = Baseline {
                rest_y: frame[RIGHT_ANKLE].y,
                foot_length: foot_length(frame),
            };
            info!(rest_y = baseline.rest_y, foot_length = baseline.foot_length, "leg baseline established");
            self.baseline = Some(baseline);
            return Progress::Continue;
        };

        let rise = baseline.rest_y - frame[RIGHT_ANKLE].y;

        if !self.clears_table && rise > self.config.clear_rise {
            info!(rise, "leg cleared the table");
            self.clears_table = true;
        }
        if rise > self.config.target_foot_lengths * baseline.foot_length {
            info!(rise, "leg reached the target");
            self.touches_target = true;
            return Progress::Done;
        }
        Progress::Continue
    }

    fn finish(self, _end: RunEnd) -> LegRaiseObservation {
        LegRaiseObservation {
            clears_table: self.clears_table,
            touches_target: self.touches_target,
        }
    }
}
