#![allow(dead_code)]

use std::time::Duration;

use cmas_core::landmark::FULL_BODY;
use cmas_core::{Frame, Landmark};
use cmas_pose::FrameSource;
use tokio::time::Instant;

/// A source whose frame is a function of time since it was created.
///
/// Under a paused tokio clock the elapsed time it sees is exact, so scripts
/// can switch posture at precise instants.
pub struct ScriptedSource<F> {
    started: Instant,
    script: F,
    pub polls: usize,
}

impl<F> ScriptedSource<F>
where
    F: FnMut(Duration) -> Option<Frame> + Send,
{
    pub fn new(script: F) -> Self {
        Self {
            started: Instant::now(),
            script,
            polls: 0,
        }
    }
}

impl<F> FrameSource for ScriptedSource<F>
where
    F: FnMut(Duration) -> Option<Frame> + Send,
{
    async fn poll(&mut self) -> Option<Frame> {
        self.polls += 1;
        let elapsed = Instant::now() - self.started;
        (self.script)(elapsed)
    }
}

/// A source with no pose to report, ever.
pub fn absent() -> ScriptedSource<impl FnMut(Duration) -> Option<Frame> + Send> {
    ScriptedSource::new(|_| None)
}

pub fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s)
}

/// Builder for a full 33-point pose. Unset points sit at the image centre.
#[derive(Debug, Clone)]
pub struct Pose {
    landmarks: Vec<Landmark>,
}

impl Pose {
    pub fn new() -> Self {
        Self {
            landmarks: vec![Landmark::new(0.5, 0.5); FULL_BODY],
        }
    }

    pub fn at(mut self, index: usize, x: f64, y: f64) -> Self {
        self.landmarks[index] = Landmark::new(x, y);
        self
    }

    /// Set the `y` of several points, keeping their `x`.
    pub fn y(mut self, indices: &[usize], y: f64) -> Self {
        for &i in indices {
            self.landmarks[i].y = y;
        }
        self
    }

    pub fn frame(&self) -> Frame {
        Frame::new(self.landmarks.clone())
    }

    /// The first `len` points only, as a service with a partial detection
    /// would report.
    pub fn truncated(&self, len: usize) -> Frame {
        Frame::new(self.landmarks[..len].to_vec())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new()
    }
}
