//! All-fours maneuver. Head raise, crawl and leg lift are only looked for
//! once the all-fours posture itself has been seen.

use std::time::Duration;

use cmas_core::landmark::{
    LEFT_ANKLE, LEFT_HIP, LEFT_KNEE, LEFT_WRIST, NOSE, RIGHT_ANKLE, RIGHT_HIP, RIGHT_KNEE,
    RIGHT_WRIST,
};
use cmas_core::observation::AllFoursObservation;
use cmas_core::{Frame, TestId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Timing;
use crate::detector::{Detector, Progress, RunEnd};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AllFoursConfig {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    pub min_landmarks: usize,
    /// Nose this far above the hips counts as a raised head.
    pub head_rise: f64,
    /// Horizontal drift of hips or hands from the starting position that
    /// counts as crawling.
    pub crawl_distance: f64,
    /// Ankle this far above its knee counts as a lifted leg.
    pub leg_rise: f64,
}

impl Default for AllFoursConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            timeout_ms: 20_000,
            min_landmarks: 29,
            head_rise: 0.05,
            crawl_distance: 0.05,
            leg_rise: 0.1,
        }
    }
}

impl AllFoursConfig {
    pub fn timing(&self) -> Timing {
        Timing::from_millis(0, self.poll_interval_ms, self.timeout_ms)
    }
}

/// Where hips and hands were when all-fours was reached.
#[derive(Debug, Clone, Copy)]
struct Origin {
    hip_x: f64,
    wrist_x: f64,
}

pub struct AllFoursDetector {
    config: AllFoursConfig,
    origin: Option<Origin>,
    observation: AllFoursObservation,
}

impl AllFoursDetector {
    pub fn new(config: AllFoursConfig) -> Self {
        Self {
            config,
            origin: None,
            observation: AllFoursObservation::default(),
        }
    }
}

impl Detector for AllFoursDetector {
    type Output = AllFoursObservation;

    fn test(&self) -> TestId {
        TestId::AllFours
    }

    fn timing(&self) -> Timing {
        self.config.timing()
    }

    fn min_landmarks(&self) -> usize {
        self.config.min_landmarks
    }

    fn landmarks(&self) -> &'static [usize] {
        &[
            NOSE,
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
        let hip_y = frame.mid_y(LEFT_HIP, RIGHT_HIP);
        let hip_x = frame.mid_x(LEFT_HIP, RIGHT_HIP);
        let wrist_x = frame.mid_x(LEFT_WRIST, RIGHT_WRIST);

        let origin = match self.origin {
            Some(origin) => origin,
            None => {
                let on_all_fours = frame.mid_y(LEFT_WRIST, RIGHT_WRIST) > hip_y
                    && frame.mid_y(LEFT_KNEE, RIGHT_KNEE) > hip_y;
                if !on_all_fours {
                    return Progress::Continue;
                }
                info!(at_ms = at.as_millis() as u64, "entered all-fours");
                self.observation.reached_at = Some(at);
                *self.origin.insert(Origin { hip_x, wrist_x })
            }
        };

        let obs = &mut self.observation;

        if obs.raised_head_at.is_none() && frame[NOSE].y < hip_y - self.config.head_rise {
            info!(at_ms = at.as_millis() as u64, "head raised");
            obs.raised_head_at = Some(at);
        }

        if obs.crawled_at.is_none()
            && ((hip_x - origin.hip_x).abs() > self.config.crawl_distance
                || (wrist_x - origin.wrist_x).abs() > self.config.crawl_distance)
        {
            info!(at_ms = at.as_millis() as u64, "crawling detected");
            obs.crawled_at = Some(at);
        }

        let leg_up = frame[LEFT_ANKLE].y < frame[LEFT_KNEE].y - self.config.leg_rise
            || frame[RIGHT_ANKLE].y < frame[RIGHT_KNEE].y - self.config.leg_rise;
        if leg_up {
            info!(at_ms = at.as_millis() as u64, "leg lifted");
            obs.leg_lifted_at = Some(at);
            return Progress::Done;
        }
        Progress::Continue
    }

    fn finish(self, _end: RunEnd) -> AllFoursObservation {
        self.observation
    }
}

#[cfg(test)]
mod tests {
    use cmas_core::Landmark;

    use super::*;

    fn kneeling() -> Vec<Landmark> {
        let mut lm = vec![Landmark::new(0.5, 0.5); 29];
        lm[NOSE] = Landmark::new(0.3, 0.55);
        for i in [LEFT_HIP, RIGHT_HIP] {
            lm[i] = Landmark::new(0.6, 0.5);
        }
        for i in [LEFT_WRIST, RIGHT_WRIST] {
            lm[i] = Landmark::new(0.35, 0.7);
        }
        for i in [LEFT_KNEE, RIGHT_KNEE] {
            lm[i] = Landmark::new(0.6, 0.7);
        }
        for i in [LEFT_ANKLE, RIGHT_ANKLE] {
            lm[i] = Landmark::new(0.8, 0.7);
        }
        lm
    }

    #[test]
    fn later_stages_wait_for_the_posture() {
        let mut d = AllFoursDetector::new(AllFoursConfig::default());

        // Hands above the hips: not on all fours, so the raised ankle is ignored.
        let mut standing = vec![Landmark::new(0.5, 0.9); 29];
        standing[LEFT_HIP] = Landmark::new(0.5, 0.5);
        standing[RIGHT_HIP] = Landmark::new(0.5, 0.5);
        standing[LEFT_WRIST] = Landmark::new(0.5, 0.45);
        standing[RIGHT_WRIST] = Landmark::new(0.5, 0.45);
        standing[LEFT_ANKLE] = Landmark::new(0.5, 0.6);
        assert_eq!(d.observe(&Frame::new(standing), Duration::ZERO), Progress::Continue);
        assert!(d.origin.is_none());

        let frame = Frame::new(kneeling());
        assert_eq!(d.observe(&frame, Duration::from_secs(1)), Progress::Continue);
        let obs = d.finish(RunEnd {
            at: Duration::from_secs(20),
            timed_out: true,
        });
        assert!(obs.reached_all_fours());
        assert!(!obs.raised_head());
        assert!(!obs.crawled());
    }
}
