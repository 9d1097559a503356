//! Terminal outputs of the test detectors.
//!
//! Each struct is produced exactly once per test run and never mutated
//! afterwards. Stage times are offsets from the start of the measured window.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::test_id::TestId;

/// A posture held from an onset until release (or until the test timed out).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HoldObservation {
    pub onset_at: Option<Duration>,
    pub released_at: Option<Duration>,
    /// Zero when no onset was seen.
    pub held: Duration,
}

impl HoldObservation {
    pub fn held_secs(&self) -> f64 {
        self.held.as_secs_f64()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegRaiseObservation {
    pub clears_table: bool,
    pub touches_target: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupineToProneObservation {
    pub rolled_side_at: Option<Duration>,
    pub freed_arm_at: Option<Duration>,
    pub prone_at: Option<Duration>,
    /// Prone reached quickly with a prompt arm release.
    pub clean: bool,
}

impl SupineToProneObservation {
    pub fn rolled_side(&self) -> bool {
        self.rolled_side_at.is_some()
    }

    pub fn freed_arm(&self) -> bool {
        self.freed_arm_at.is_some()
    }

    pub fn reached_prone(&self) -> bool {
        self.prone_at.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SitUpObservation {
    /// Repetitions detected inside their windows.
    pub completed: u32,
    /// Repetition windows opened.
    pub attempted: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupineToSitObservation {
    pub transitioned: bool,
    pub struggled: bool,
    /// Time from the supine baseline (or the start of the window) to sitting.
    pub duration: Option<Duration>,
}

/// Arm raise grade, ordered from no lift to full extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmRaiseGrade {
    #[default]
    NoLift,
    PartialLift,
    LiftWithoutExtension,
    FullExtension,
}

/// Predicates from the frame that settled the arm raise test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArmRaiseObservation {
    /// At least one wrist above its shoulder.
    pub above_shoulder: bool,
    /// At least one wrist above the head-line.
    pub above_head: bool,
    /// Both wrists above the head-line with both elbows straight.
    pub fully_extended: bool,
}

impl ArmRaiseObservation {
    pub fn grade(&self) -> ArmRaiseGrade {
        if !self.above_shoulder {
            ArmRaiseGrade::NoLift
        } else if !self.above_head {
            ArmRaiseGrade::PartialLift
        } else if !self.fully_extended {
            ArmRaiseGrade::LiftWithoutExtension
        } else {
            ArmRaiseGrade::FullExtension
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FloorSitObservation {
    pub reached_sit: bool,
    pub hesitant: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllFoursObservation {
    pub reached_at: Option<Duration>,
    pub raised_head_at: Option<Duration>,
    pub crawled_at: Option<Duration>,
    pub leg_lifted_at: Option<Duration>,
}

impl AllFoursObservation {
    pub fn reached_all_fours(&self) -> bool {
        self.reached_at.is_some()
    }

    pub fn raised_head(&self) -> bool {
        self.raised_head_at.is_some()
    }

    pub fn crawled(&self) -> bool {
        self.crawled_at.is_some()
    }

    pub fn leg_lifted(&self) -> bool {
        self.leg_lifted_at.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FloorRiseObservation {
    pub stood_up: bool,
    pub used_hands: bool,
    pub struggled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChairRiseObservation {
    pub stood_up: bool,
    pub used_chair_side: bool,
    pub used_thighs: bool,
    pub struggled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoolStepObservation {
    pub attempted: bool,
    pub used_support: bool,
    pub used_thigh: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PickUpObservation {
    pub attempted: bool,
    pub heavy_support: bool,
    pub light_support: bool,
    pub completed: bool,
}

/// The observation of any one test, tagged by test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "test", rename_all = "snake_case")]
pub enum Observation {
    HeadElevation(HoldObservation),
    LegRaise(LegRaiseObservation),
    LegLiftDuration(HoldObservation),
    SupineToProne(SupineToProneObservation),
    SitUps(SitUpObservation),
    SupineToSit(SupineToSitObservation),
    ArmRaise(ArmRaiseObservation),
    ArmRaiseDuration(HoldObservation),
    FloorSit(FloorSitObservation),
    AllFours(AllFoursObservation),
    FloorRise(FloorRiseObservation),
    ChairRise(ChairRiseObservation),
    StoolStep(StoolStepObservation),
    PickUpObject(PickUpObservation),
}

impl Observation {
    pub fn test(&self) -> TestId {
        match self {
            Observation::HeadElevation(_) => TestId::HeadElevation,
            Observation::LegRaise(_) => TestId::LegRaise,
            Observation::LegLiftDuration(_) => TestId::LegLiftDuration,
            Observation::SupineToProne(_) => TestId::SupineToProne,
            Observation::SitUps(_) => TestId::SitUps,
            Observation::SupineToSit(_) => TestId::SupineToSit,
            Observation::ArmRaise(_) => TestId::ArmRaise,
            Observation::ArmRaiseDuration(_) => TestId::ArmRaiseDuration,
            Observation::FloorSit(_) => TestId::FloorSit,
            Observation::AllFours(_) => TestId::AllFours,
            Observation::FloorRise(_) => TestId::FloorRise,
            Observation::ChairRise(_) => TestId::ChairRise,
            Observation::StoolStep(_) => TestId::StoolStep,
            Observation::PickUpObject(_) => TestId::PickUpObject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_raise_grade_follows_precedence() {
        let grade = |above_shoulder, above_head, fully_extended| {
            ArmRaiseObservation {
                above_shoulder,
                above_head,
                fully_extended,
            }
            .grade()
        };
        assert_eq!(grade(false, true, true), ArmRaiseGrade::NoLift);
        assert_eq!(grade(true, false, true), ArmRaiseGrade::PartialLift);
        assert_eq!(grade(true, true, false), ArmRaiseGrade::LiftWithoutExtension);
        assert_eq!(grade(true, true, true), ArmRaiseGrade::FullExtension);
    }

    #[test]
    fn observation_is_tagged_by_test() {
        let obs = Observation::FloorSit(FloorSitObservation {
            reached_sit: true,
            hesitant: false,
        });
        assert_eq!(obs.test(), TestId::FloorSit);

        let json = serde_json::to_value(obs).unwrap();
        assert_eq!(json["test"], "floor_sit");
        assert_eq!(json["reached_sit"], true);
    }
}
