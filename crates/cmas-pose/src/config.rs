//! Tunable parameters for every test.
//!
//! All thresholds are in normalized image units (y grows downwards) unless a
//! field name says otherwise. Defaults reproduce the reference battery; a
//! config file only needs to name what it overrides.

use std::time::Duration;

use cmas_core::TestId;
use serde::{Deserialize, Serialize};

use crate::detectors::{
    all_fours::AllFoursConfig, arm_raise::ArmRaiseConfig, chair_rise::ChairRiseConfig,
    floor_rise::FloorRiseConfig, floor_sit::FloorSitConfig, hold::ArmHoldConfig,
    hold::HeadElevationConfig, hold::LegLiftConfig, leg_raise::LegRaiseConfig,
    pick_up::PickUpConfig, sit_ups::SitUpConfig, stool_step::StoolStepConfig,
    supine_to_prone::SupineToProneConfig, supine_to_sit::SupineToSitConfig,
};
use crate::error::PoseError;

/// Resolved clock parameters for one test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Pause before the measured window opens.
    pub lead_in: Duration,
    pub poll_interval: Duration,
    /// Length of the measured window.
    pub timeout: Duration,
}

impl Timing {
    pub fn from_millis(lead_in_ms: u64, poll_interval_ms: u64, timeout_ms: u64) -> Self {
        Self {
            lead_in: Duration::from_millis(lead_in_ms),
            poll_interval: Duration::from_millis(poll_interval_ms),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn validate(&self, test: TestId) -> Result<(), PoseError> {
        if self.poll_interval.is_zero() {
            return Err(PoseError::InvalidTiming {
                test,
                field: "poll_interval_ms",
            });
        }
        if self.timeout.is_zero() {
            return Err(PoseError::InvalidTiming {
                test,
                field: "timeout_ms",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    pub head_elevation: HeadElevationConfig,
    pub leg_raise: LegRaiseConfig,
    pub leg_lift_duration: LegLiftConfig,
    pub supine_to_prone: SupineToProneConfig,
    pub sit_ups: SitUpConfig,
    pub supine_to_sit: SupineToSitConfig,
    pub arm_raise: ArmRaiseConfig,
    pub arm_raise_duration: ArmHoldConfig,
    pub floor_sit: FloorSitConfig,
    pub all_fours: AllFoursConfig,
    pub floor_rise: FloorRiseConfig,
    pub chair_rise: ChairRiseConfig,
    pub stool_step: StoolStepConfig,
    pub pick_up_object: PickUpConfig,
}

impl BatteryConfig {
    pub fn timing(&self, test: TestId) -> Timing {
        match test {
            TestId::HeadElevation => self.head_elevation.timing(),
            TestId::LegRaise => self.leg_raise.timing(),
            TestId::LegLiftDuration => self.leg_lift_duration.timing(),
            TestId::SupineToProne => self.supine_to_prone.timing(),
            TestId::SitUps => self.sit_ups.timing(),
            TestId::SupineToSit => self.supine_to_sit.timing(),
            TestId::ArmRaise => self.arm_raise.timing(),
            TestId::ArmRaiseDuration => self.arm_raise_duration.timing(),
            TestId::FloorSit => self.floor_sit.timing(),
            TestId::AllFours => self.all_fours.timing(),
            TestId::FloorRise => self.floor_rise.timing(),
            TestId::ChairRise => self.chair_rise.timing(),
            TestId::StoolStep => self.stool_step.timing(),
            TestId::PickUpObject => self.pick_up_object.timing(),
        }
    }

    /// Check every test's timing up front, before any test is run.
    pub fn validate(&self) -> Result<(), PoseError> {
        TestId::ALL
            .into_iter()
            .try_for_each(|test| self.timing(test).validate(test))
    }

    /// Same parameters with every lead-in removed.
    pub fn without_lead_in(mut self) -> Self {
        self.head_elevation.lead_in_ms = 0;
        self
    }
}
