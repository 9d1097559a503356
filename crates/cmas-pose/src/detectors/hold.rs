//! Timed holds: head elevation, straight leg lift and arm raise duration.
//!
//! All three time a posture from the sample where it is first reached to the
//! sample where it is released. A hold still in progress at the timeout is
//! credited up to the timeout.

use std::time::Duration;

use cmas_core::landmark::{
    LEFT_SHOULDER, LEFT_WRIST, NOSE, RIGHT_ANKLE, RIGHT_FOOT_INDEX, RIGHT_SHOULDER, RIGHT_WRIST,
};
use cmas_core::observation::HoldObservation;
use cmas_core::{Frame, TestId};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::foot_length;
use crate::config::Timing;
use crate::detector::{Detector, Progress, RunEnd};

/// The posture a [`HoldDetector`] times.
pub trait HoldSignal: Send {
    fn test(&self) -> TestId;
    fn timing(&self) -> Timing;
    fn min_landmarks(&self) -> usize;
    fn landmarks(&self) -> &'static [usize];

    /// Take calibration from the frame if still needed. Returns `true` when
    /// the frame was used up by calibration and must not be judged.
    fn calibrate(&mut self, _frame: &Frame) -> bool {
        false
    }

    fn onset(&self, frame: &Frame) -> bool;

    fn released(&self, frame: &Frame) -> bool;
}

pub struct HoldDetector<S> {
    signal: S,
    onset_at: Option<Duration>,
    released_at: Option<Duration>,
}

impl<S: HoldSignal> HoldDetector<S> {
    pub fn new(signal: S) -> Self {
        Self {
            signal,
            onset_at: None,
            released_at: None,
        }
    }
}

impl<S: HoldSignal> Detector for HoldDetector<S> {
    type Output = HoldObservation;

    fn test(&self) -> TestId {
        self.signal.test()
    }

    fn timing(&self) -> Timing {
        self.signal.timing()
    }

    fn min_landmarks(&self) -> usize {
        self.signal.min_landmarks()
    }

    fn landmarks(&self) -> &'static [usize] {
        self.signal.landmarks()
    }

    fn observe(&mut self, frame: &Frame, at: Duration) -> Progress {
        if self.signal.calibrate(frame) {
            return Progress::Continue;
        }

        match self.onset_at {
            None if self.signal.onset(frame) => {
                info!(test = %self.signal.test(), at_ms = at.as_millis() as u64, "hold started");
                self.onset_at = Some(at);
            }
            Some(_) if self.signal.released(frame) => {
                info!(test = %self.signal.test(), at_ms = at.as_millis() as u64, "hold released");
                self.released_at = Some(at);
                return Progress::Done;
            }
            _ => {}
        }
        Progress::Continue
    }

    fn finish(self, end: RunEnd) -> HoldObservation {
        let held = match self.onset_at {
            Some(onset) => self.released_at.unwrap_or(end.at).saturating_sub(onset),
            None => Duration::ZERO,
        };
        HoldObservation {
            onset_at: self.onset_at,
            released_at: self.released_at,
            held,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadElevationConfig {
    pub lead_in_ms: u64,
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    pub min_landmarks: usize,
    /// Rise of the nose above its baseline that counts as lifted.
    pub onset_rise: f64,
    /// The head is down again once the nose is within this of the baseline.
    pub release_rise: f64,
}

impl Default for HeadElevationConfig {
    fn default() -> Self {
        Self {
            lead_in_ms: 5000,
            poll_interval_ms: 200,
            timeout_ms: 120_000,
            min_landmarks: 1,
            onset_rise: 0.05,
            release_rise: 0.005,
        }
    }
}

impl HeadElevationConfig {
    pub fn timing(&self) -> Timing {
        Timing::from_millis(self.lead_in_ms, self.poll_interval_ms, self.timeout_ms)
    }
}

/// Nose height against the resting baseline taken from the first frame.
pub struct HeadLift {
    config: HeadElevationConfig,
    baseline_y: Option<f64>,
}

impl HeadLift {
    pub fn new(config: HeadElevationConfig) -> Self {
        Self {
            config,
            baseline_y: None,
        }
    }

    fn baseline(&self) -> f64 {
        self.baseline_y.unwrap_or(f64::NAN)
    }
}

impl HoldSignal for HeadLift {
    fn test(&self) -> TestId {
        TestId::HeadElevation
    }

    fn timing(&self) -> Timing {
        self.config.timing()
    }

    fn min_landmarks(&self) -> usize {
        self.config.min_landmarks
    }

    fn landmarks(&self) -> &'static [usize] {
        &[NOSE]
    }

    fn calibrate(&mut self, frame: &Frame) -> bool {
        if self.baseline_y.is_none() {
            let y = frame[NOSE].y;
            info!(baseline_y = y, "head baseline established");
            self.baseline_y = Some(y);
        }
        false
    }

    fn onset(&self, frame: &Frame) -> bool {
        frame[NOSE].y < self.baseline() - self.config.onset_rise
    }

    fn released(&self, frame: &Frame) -> bool {
        frame[NOSE].y > self.baseline() - self.config.release_rise
    }
}

pub type HeadElevationDetector = HoldDetector<HeadLift>;

impl HeadElevationDetector {
    pub fn head_elevation(config: HeadElevationConfig) -> Self {
        Self::new(HeadLift::new(config))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LegLiftConfig {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    pub min_landmarks: usize,
    /// Required ankle rise, in foot lengths.
    pub target_foot_lengths: f64,
}

impl Default for LegLiftConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            timeout_ms: 120_000,
            min_landmarks: 33,
            target_foot_lengths: 1.0,
        }
    }
}

impl LegLiftConfig {
    pub fn timing(&self) -> Timing {
        Timing::from_millis(0, self.poll_interval_ms, self.timeout_ms)
    }
}

/// Ankle held above a target line set one foot length over its rest height.
pub struct LegHold {
    config: LegLiftConfig,
    target_y: Option<f64>,
}

impl LegHold {
    pub fn new(config: LegLiftConfig) -> Self {
        Self {
            config,
            target_y: None,
        }
    }

    fn above_target(&self, frame: &Frame) -> bool {
        self.target_y
            .is_some_and(|target| frame[RIGHT_ANKLE].y < target)
    }
}

impl HoldSignal for LegHold {
    fn test(&self) -> TestId {
        TestId::LegLiftDuration
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

    fn calibrate(&mut self, frame: &Frame) -> bool {
        if self.target_y.is_some() {
            return false;
        }
        let rest_y = frame[RIGHT_ANKLE].y;
        let foot = foot_length(frame);
        let target = rest_y - self.config.target_foot_lengths * foot;
        info!(rest_y, foot_length = foot, target_y = target, "leg baseline established");
        self.target_y = Some(target);
        true
    }

    fn onset(&self, frame: &Frame) -> bool {
        self.above_target(frame)
    }

    fn released(&self, frame: &Frame) -> bool {
        !self.above_target(frame)
    }
}

pub type LegLiftDetector = HoldDetector<LegHold>;

impl LegLiftDetector {
    pub fn leg_lift(config: LegLiftConfig) -> Self {
        Self::new(LegHold::new(config))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmHoldConfig {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    pub min_landmarks: usize,
}

impl Default for ArmHoldConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            timeout_ms: 65_000,
            min_landmarks: 17,
        }
    }
}

impl ArmHoldConfig {
    pub fn timing(&self) -> Timing {
        Timing::from_millis(0, self.poll_interval_ms, self.timeout_ms)
    }
}

/// Both wrists above their shoulders.
pub struct ArmsUp {
    config: ArmHoldConfig,
}

impl ArmsUp {
    pub fn new(config: ArmHoldConfig) -> Self {
        Self { config }
    }

    fn both_up(frame: &Frame) -> bool {
        frame[LEFT_WRIST].y < frame[LEFT_SHOULDER].y
            && frame[RIGHT_WRIST].y < frame[RIGHT_SHOULDER].y
    }
}

impl HoldSignal for ArmsUp {
    fn test(&self) -> TestId {
        TestId::ArmRaiseDuration
    }

    fn timing(&self) -> Timing {
        self.config.timing()
    }

    fn min_landmarks(&self) -> usize {
        self.config.min_landmarks
    }

    fn landmarks(&self) -> &'static [usize] {
        &[LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_WRIST, RIGHT_WRIST]
    }

    fn onset(&self, frame: &Frame) -> bool {
        Self::both_up(frame)
    }

    fn released(&self, frame: &Frame) -> bool {
        !Self::both_up(frame)
    }
}

pub type ArmHoldDetector = HoldDetector<ArmsUp>;

impl ArmHoldDetector {
    pub fn arm_hold(config: ArmHoldConfig) -> Self {
        Self::new(ArmsUp::new(config))
    }
}
