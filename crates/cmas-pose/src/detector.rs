//! The shared polling skeleton every test runs on.

use std::time::Duration;

use cmas_core::{Frame, TestId};
use tokio::time::{sleep, sleep_until, timeout_at, Instant};
use tracing::{debug, info, trace};

use crate::config::Timing;
use crate::error::PoseError;
use crate::source::FrameSource;

/// Whether a detector wants more samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Continue,
    Done,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunEnd {
    /// Offset from the start of the measured window. On timeout this is the
    /// timeout itself, not the moment the loop noticed.
    pub at: Duration,
    pub timed_out: bool,
}

/// A per-test state machine fed one usable frame per sample.
///
/// Detectors never see the clock directly: every call carries the offset
/// from the start of the measured window, which keeps them deterministic.
pub trait Detector: Send {
    type Output;

    fn test(&self) -> TestId;

    fn timing(&self) -> Timing;

    /// Frames shorter than this are skipped without reaching the detector.
    fn min_landmarks(&self) -> usize;

    /// Every landmark index [`Detector::observe`] reads.
    fn landmarks(&self) -> &'static [usize];

    fn observe(&mut self, frame: &Frame, at: Duration) -> Progress;

    /// Called once per sample before polling, whether or not a frame arrives.
    fn tick(&mut self, _at: Duration) -> Progress {
        Progress::Continue
    }

    fn finish(self, end: RunEnd) -> Self::Output;
}

/// Reject a detector that would index past its own minimum frame length.
pub fn check_landmarks<D: Detector>(detector: &D) -> Result<(), PoseError> {
    let min_landmarks = detector.min_landmarks();
    match detector.landmarks().iter().find(|&&i| i >= min_landmarks) {
        Some(&index) => Err(PoseError::LandmarkOutOfRange {
            test: detector.test(),
            index,
            min_landmarks,
        }),
        None => Ok(()),
    }
}

/// Drive `detector` against `source` until it completes or its timeout
/// passes, and return its observation.
///
/// One poll per interval, with the interval measured from the start of each
/// sample. Absent or short frames are skipped. No sleep or poll extends past
/// the deadline.
pub async fn run_detector<S, D>(source: &mut S, mut detector: D) -> Result<D::Output, PoseError>
where
    S: FrameSource,
    D: Detector,
{
    let test = detector.test();
    let timing = detector.timing();
    timing.validate(test)?;
    check_landmarks(&detector)?;
    let min_landmarks = detector.min_landmarks();

    if !timing.lead_in.is_zero() {
        info!(%test, lead_in_ms = timing.lead_in.as_millis() as u64, "get ready");
        sleep(timing.lead_in).await;
    }

    let started = Instant::now();
    let deadline = started + timing.timeout;
    info!(%test, timeout_ms = timing.timeout.as_millis() as u64, "test started");

    loop {
        let sample_at = Instant::now();
        if sample_at >= deadline {
            break;
        }

        if detector.tick(sample_at - started) == Progress::Done {
            let end = RunEnd {
                at: sample_at - started,
                timed_out: false,
            };
            info!(%test, elapsed_ms = end.at.as_millis() as u64, "test completed");
            return Ok(detector.finish(end));
        }

        match timeout_at(deadline, source.poll()).await {
            Ok(Some(frame)) if frame.covers(min_landmarks) => {
                let at = Instant::now() - started;
                if detector.observe(&frame, at) == Progress::Done {
                    info!(%test, elapsed_ms = at.as_millis() as u64, "test completed");
                    return Ok(detector.finish(RunEnd {
                        at,
                        timed_out: false,
                    }));
                }
            }
            Ok(Some(frame)) => trace!(%test, len = frame.len(), min_landmarks, "short frame skipped"),
            Ok(None) => trace!(%test, "no frame available"),
            Err(_) => break,
        }

        sleep_until((sample_at + timing.poll_interval).min(deadline)).await;
    }

    debug!(%test, "test timed out");
    Ok(detector.finish(RunEnd {
        at: timing.timeout,
        timed_out: true,
    }))
}
