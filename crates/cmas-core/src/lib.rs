//! cmas-core
//!
//! Pure domain types for the CMAS movement battery: landmarks and frames,
//! the fourteen test identifiers, per-test observations, sub-scores and the
//! battery result. No I/O; this is the shared vocabulary of the system.

pub mod error;
pub mod landmark;
pub mod observation;
pub mod score;
pub mod test_id;

pub use error::CoreError;
pub use landmark::{Frame, Landmark, LandmarkPayload};
pub use observation::Observation;
pub use score::{BatteryReport, BatteryResult, ReportEntry, SubScore};
pub use test_id::TestId;
