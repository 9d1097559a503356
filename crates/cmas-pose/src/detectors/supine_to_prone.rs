//! Rolling from supine to prone in three ordered stages: onto the side,
//! freeing the underneath arm, then face down.

use std::time::Duration;

use cmas_core::landmark::{LEFT_HIP, LEFT_SHOULDER, RIGHT_HIP, RIGHT_SHOULDER, RIGHT_WRIST};
use cmas_core::observation::SupineToProneObservation;
use cmas_core::{Frame, TestId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Timing;
use crate::detector::{Detector, Progress, RunEnd};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupineToProneConfig {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    pub min_landmarks: usize,
    /// Shoulders and hips each closer than this horizontally means side-lying.
    pub side_overlap: f64,
    /// Wrist this far from the torso midline counts as freed.
    pub arm_clearance: f64,
    /// Wrist level with the shoulder within this counts as prone.
    pub prone_level: f64,
    /// A clean roll reaches prone within this of the window opening.
    pub clean_total_ms: u64,
    /// And frees the arm within this of turning onto the side.
    pub clean_arm_delay_ms: u64,
}

impl Default for SupineToProneConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            timeout_ms: 15_000,
            min_landmarks: 25,
            side_overlap: 0.1,
            arm_clearance: 0.1,
            prone_level: 0.05,
            clean_total_ms: 6000,
            clean_arm_delay_ms: 2000,
        }
    }
}

impl SupineToProneConfig {
    pub fn timing(&self) -> Timing {
        Timing::from_millis(0, self.poll_interval_ms, self.timeout_ms)
    }
}

pub struct SupineToProneDetector {
    config: SupineToProneConfig,
    rolled_side_at: Option<Duration>,
    freed_arm_at: Option<Duration>,
    prone_at: Option<Duration>,
}

impl SupineToProneDetector {
    pub fn new(config: SupineToProneConfig) -> Self {
        Self {
            config,
            rolled_side_at: None,
            freed_arm_at: None,
            prone_at: None,
        }
    }

    fn is_clean(&self) -> bool {
        let (Some(rolled), Some(freed), Some(prone)) =
            (self.rolled_side_at, self.freed_arm_at, self.prone_at)
        else {
            return false;
        };
        prone < Duration::from_millis(self.config.clean_total_ms)
            && freed.saturating_sub(rolled) < Duration::from_millis(self.config.clean_arm_delay_ms)
    }
}

impl Detector for SupineToProneDetector {
    type Output = SupineToProneObservation;

    fn test(&self) -> TestId {
        TestId::SupineToProne
    }

    fn timing(&self) -> Timing {
        self.config.timing()
    }

    fn min_landmarks(&self) -> usize {
        self.config.min_landmarks
    }

    fn landmarks(&self) -> &'static [usize] {
        &[LEFT_SHOULDER, RIGHT_SHOULDER, RIGHT_WRIST, LEFT_HIP, RIGHT_HIP]
    }

    fn observe(&mut self, frame: &Frame, at: Duration) -> Progress {
        let shoulder_gap = (frame[RIGHT_SHOULDER].x - frame[LEFT_SHOULDER].x).abs();
        let hip_gap = (frame[RIGHT_HIP].x - frame[LEFT_HIP].x).abs();

        if self.rolled_side_at.is_none()
            && shoulder_gap < self.config.side_overlap
            && hip_gap < self.config.side_overlap
        {
            info!(at_ms = at.as_millis() as u64, "rolled onto side");
            self.rolled_side_at = Some(at);
        }

        let torso_mid_x = (frame[RIGHT_SHOULDER].x + frame[RIGHT_HIP].x) / 2.0;
        if self.rolled_side_at.is_some()
            && self.freed_arm_at.is_none()
            && (frame[RIGHT_WRIST].x - torso_mid_x).abs() > self.config.arm_clearance
        {
            info!(at_ms = at.as_millis() as u64, "arm freed");
            self.freed_arm_at = Some(at);
        }

        if self.rolled_side_at.is_some()
            && self.freed_arm_at.is_some()
            && (frame[RIGHT_WRIST].y - frame[RIGHT_SHOULDER].y).abs() < self.config.prone_level
        {
            info!(at_ms = at.as_millis() as u64, "reached prone");
            self.prone_at = Some(at);
            return Progress::Done;
        }
        Progress::Continue
    }

    fn finish(self, _end: RunEnd) -> SupineToProneObservation {
        SupineToProneObservation {
            clean: self.is_clean(),
            rolled_side_at: self.rolled_side_at,
            freed_arm_at: self.freed_arm_at,
            prone_at: self.prone_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector_with(rolled: u64, freed: u64, prone: u64) -> SupineToProneDetector {
        let ms = Duration::from_millis;
        SupineToProneDetector {
            config: SupineToProneConfig::default(),
            rolled_side_at: Some(ms(rolled)),
            freed_arm_at: Some(ms(freed)),
            prone_at: Some(ms(prone)),
        }
    }

    #[test]
    fn clean_needs_fast_prone_and_prompt_arm() {
        assert!(detector_with(1000, 2500, 5000).is_clean());
        // Arm freed two seconds after the roll.
        assert!(!detector_with(1000, 3000, 5000).is_clean());
        assert!(!detector_with(1000, 2000, 6000).is_clean());
    }

    #[test]
    fn missing_stage_is_never_clean() {
        let mut d = detector_with(1000, 1200, 1400);
        d.prone_at = None;
        assert!(!d.is_clean());
    }
}
