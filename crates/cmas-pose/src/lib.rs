//! cmas-pose
//!
//! Movement detection for the CMAS battery. Pulls landmark frames from a
//! [`FrameSource`](source::FrameSource), runs one detector state machine per
//! test on a fixed polling cadence, and hands the resulting observation to
//! the rubric.

pub mod config;
pub mod detector;
pub mod detectors;
pub mod error;
pub mod freeze;
pub mod geometry;
pub mod runner;
pub mod source;

pub use config::{BatteryConfig, Timing};
pub use detector::{run_detector, Detector, Progress, RunEnd};
pub use error::PoseError;
pub use runner::{run_battery, run_test, run_tests, BatteryRun, Scored};
pub use source::{FrameSource, HttpFrameSource, ReplaySource, SourceConfig};
