use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The fourteen tests of the battery, in administration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestId {
    HeadElevation,
    LegRaise,
    LegLiftDuration,
    SupineToProne,
    SitUps,
    SupineToSit,
    ArmRaise,
    ArmRaiseDuration,
    FloorSit,
    AllFours,
    FloorRise,
    ChairRise,
    StoolStep,
    PickUpObject,
}

impl TestId {
    pub const ALL: [TestId; 14] = [
        TestId::HeadElevation,
        TestId::LegRaise,
        TestId::LegLiftDuration,
        TestId::SupineToProne,
        TestId::SitUps,
        TestId::SupineToSit,
        TestId::ArmRaise,
        TestId::ArmRaiseDuration,
        TestId::FloorSit,
        TestId::AllFours,
        TestId::FloorRise,
        TestId::ChairRise,
        TestId::StoolStep,
        TestId::PickUpObject,
    ];

    /// Stable 1-based position in the battery.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }

    /// Short identifier, matching the serde representation.
    pub fn id(self) -> &'static str {
        match self {
            TestId::HeadElevation => "head_elevation",
            TestId::LegRaise => "leg_raise",
            TestId::LegLiftDuration => "leg_lift_duration",
            TestId::SupineToProne => "supine_to_prone",
            TestId::SitUps => "sit_ups",
            TestId::SupineToSit => "supine_to_sit",
            TestId::ArmRaise => "arm_raise",
            TestId::ArmRaiseDuration => "arm_raise_duration",
            TestId::FloorSit => "floor_sit",
            TestId::AllFours => "all_fours",
            TestId::FloorRise => "floor_rise",
            TestId::ChairRise => "chair_rise",
            TestId::StoolStep => "stool_step",
            TestId::PickUpObject => "pick_up_object",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TestId::HeadElevation => "Head Elevation",
            TestId::LegRaise => "Leg Raise",
            TestId::LegLiftDuration => "Leg Lift Duration",
            TestId::SupineToProne => "Supine to Prone",
            TestId::SitUps => "Sit-Ups",
            TestId::SupineToSit => "Supine to Sit",
            TestId::ArmRaise => "Arm Raise / Straighten",
            TestId::ArmRaiseDuration => "Arm Raise / Duration",
            TestId::FloorSit => "Floor Sit",
            TestId::AllFours => "All Fours Maneuver",
            TestId::FloorRise => "Floor Rise",
            TestId::ChairRise => "Chair Rise",
            TestId::StoolStep => "Stool Step",
            TestId::PickUpObject => "Pick-Up Object",
        }
    }

    /// Highest sub-score the rubric can award. The minimum is always 0.
    pub fn max_score(self) -> u8 {
        match self {
            TestId::HeadElevation | TestId::LegLiftDuration => 5,
            TestId::LegRaise => 2,
            TestId::SupineToProne
            | TestId::SupineToSit
            | TestId::ArmRaise
            | TestId::FloorSit
            | TestId::StoolStep
            | TestId::PickUpObject => 3,
            TestId::SitUps => 6,
            TestId::ArmRaiseDuration
            | TestId::AllFours
            | TestId::FloorRise
            | TestId::ChairRise => 4,
        }
    }

    /// Patient-facing instructions shown before the test starts.
    pub fn instructions(self) -> &'static str {
        match self {
            TestId::HeadElevation => {
                "Lie on your back with your arms at your side. When prompted, lift your head off the ground and hold it up."
            }
            TestId::LegRaise => {
                "While lying flat on your back, lift one leg straight up into the air as high as you can."
            }
            TestId::LegLiftDuration => {
                "Lift one leg while keeping it straight and hold it up for as long as you can without lowering."
            }
            TestId::SupineToProne => {
                "Roll over from lying on your back (supine) to lying on your stomach (prone) without assistance."
            }
            TestId::SitUps => {
                "From a lying position, perform six sit-ups in a row without pausing for too long between each."
            }
            TestId::SupineToSit => {
                "Lie on your back and then sit up fully, using as little assistance as possible."
            }
            TestId::ArmRaise => "Raise your arms above your head and straighten them fully.",
            TestId::ArmRaiseDuration => {
                "Raise your arms above your head and hold them there for as long as you can."
            }
            TestId::FloorSit => {
                "Transition from standing to sitting cross-legged or with legs extended on the floor."
            }
            TestId::AllFours => {
                "Get onto all fours (hands and knees), then raise your head and attempt a crawling motion."
            }
            TestId::FloorRise => {
                "From a sitting or lying position on the floor, rise up to a standing position using minimal support."
            }
            TestId::ChairRise => {
                "Stand up from a seated position in a chair without using your hands for support."
            }
            TestId::StoolStep => {
                "Step up onto a low stool using one leg, showing balance and control."
            }
            TestId::PickUpObject => {
                "Bend down and pick up a small object from the floor, such as a pen, using minimal support."
            }
        }
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.name())
    }
}

impl FromStr for TestId {
    type Err = CoreError;

    /// Accepts either the battery number (`"7"`) or the short id (`"arm_raise"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(number) = s.parse::<u8>() {
            return Self::from_number(number).ok_or_else(|| CoreError::UnknownTest(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| CoreError::UnknownTest(s.to_string()))
    }
}
