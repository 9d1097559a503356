//! Repeated sit-ups, each in its own window followed by a short rest.
//!
//! A repetition counts when the torso comes up after having been seen lying
//! back. The "lying back" latch carries across windows, so a subject who
//! stays up after one repetition must lie back again before the next counts.

use std::time::Duration;

use cmas_core::landmark::{LEFT_HIP, LEFT_SHOULDER, RIGHT_HIP, RIGHT_SHOULDER};
use cmas_core::observation::SitUpObservation;
use cmas_core::{Frame, TestId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Timing;
use crate::detector::{Detector, Progress, RunEnd};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitUpConfig {
    pub poll_interval_ms: u64,
    pub repetitions: u32,
    pub rep_window_ms: u64,
    pub rest_ms: u64,
    pub min_landmarks: usize,
    /// Shoulder-minus-hip height above which the subject is lying back.
    pub rest_gap: f64,
    /// Shoulder-minus-hip height below which the subject has sat up.
    pub sit_gap: f64,
    /// Allowance per repetition for a window that opens one slow sample
    /// late. Only widens the overall timeout; the run ends when the last
    /// window closes.
    pub sample_slack_ms: u64,
}

impl Default for SitUpConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 150,
            repetitions: 6,
            rep_window_ms: 15_000,
            rest_ms: 1000,
            min_landmarks: 25,
            rest_gap: 0.15,
            sit_gap: 0.05,
            sample_slack_ms: 1000,
        }
    }
}

impl SitUpConfig {
    /// The whole run spans every window and rest, plus one late sample per
    /// repetition.
    pub fn timing(&self) -> Timing {
        let cycle_ms = self
            .rep_window_ms
            .saturating_add(self.rest_ms)
            .saturating_add(self.poll_interval_ms)
            .saturating_add(self.sample_slack_ms);
        let timeout_ms = u64::from(self.repetitions).saturating_mul(cycle_ms);
        Timing::from_millis(0, self.poll_interval_ms, timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NotStarted,
    Window { opened_at: Duration },
    Resting { until: Duration },
}

pub struct SitUpDetector {
    config: SitUpConfig,
    phase: Phase,
    lying_back: bool,
    completed: u32,
    attempted: u32,
}

impl SitUpDetector {
    pub fn new(config: SitUpConfig) -> Self {
        Self {
            config,
            phase: Phase::NotStarted,
            lying_back: true,
            completed: 0,
            attempted: 0,
        }
    }

    fn window(&self) -> Duration {
        Duration::from_millis(self.config.rep_window_ms)
    }

    fn open_window(&mut self, at: Duration) {
        self.attempted += 1;
        debug!(repetition = self.attempted, at_ms = at.as_millis() as u64, "waiting for sit-up");
        self.phase = Phase::Window { opened_at: at };
    }

    /// Close the current window and either rest or finish. The rest runs
    /// from `closed_at`, so a late sample does not push back later windows.
    fn close_window(&mut self, closed_at: Duration) -> Progress {
        if self.attempted >= self.config.repetitions {
            return Progress::Done;
        }
        self.phase = Phase::Resting {
            until: closed_at + Duration::from_millis(self.config.rest_ms),
        };
        Progress::Continue
    }
}

impl Detector for SitUpDetector {
    type Output = SitUpObservation;

    fn test(&self) -> TestId {
        TestId::SitUps
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

    fn tick(&mut self, at: Duration) -> Progress {
        match self.phase {
            Phase::NotStarted => {
                self.open_window(at);
                Progress::Continue
            }
            Phase::Window { opened_at } if at.saturating_sub(opened_at) >= self.window() => {
                info!(repetition = self.attempted, "sit-up not detected");
                self.close_window(opened_at + self.window())
            }
            Phase::Resting { until } if at >= until => {
                self.open_window(at);
                Progress::Continue
            }
            _ => Progress::Continue,
        }
    }

    fn observe(&mut self, frame: &Frame, at: Duration) -> Progress {
        let Phase::Window { opened_at } = self.phase else {
            return Progress::Continue;
        };
        if at.saturating_sub(opened_at) >= self.window() {
            return Progress::Continue;
        }

        let gap = frame.mid_y(LEFT_SHOULDER, RIGHT_SHOULDER) - frame.mid_y(LEFT_HIP, RIGHT_HIP);
        if gap > self.config.rest_gap {
            self.lying_back = true;
        }
        if self.lying_back && gap < self.config.sit_gap {
            self.completed += 1;
            self.lying_back = false;
            info!(repetition = self.attempted, completed = self.completed, "sit-up counted");
            return self.close_window(at);
        }
        Progress::Continue
    }

    fn finish(self, _end: RunEnd) -> SitUpObservation {
        SitUpObservation {
            completed: self.completed,
            attempted: self.attempted,
        }
    }
}
