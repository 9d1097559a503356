//! cmas-rubric
//!
//! Rubric scoring for the CMAS battery. Pure functions only, mapping each
//! test's observation to its ordinal sub-score and summing sub-scores into the
//! battery total.

pub mod battery;
pub mod error;
pub mod scoring;

use cmas_core::observation::Observation;
use cmas_core::SubScore;

pub use battery::{battery_total, collect_entries, total};

/// Score one observation with its test's rubric.
pub fn score(observation: &Observation) -> SubScore {
    use scoring::*;

    let value = match observation {
        Observation::HeadElevation(o) => score_head_elevation(o.held_secs()),
        Observation::LegRaise(o) => score_leg_raise(o.clears_table, o.touches_target),
        Observation::LegLiftDuration(o) => score_leg_lift_duration(o.held_secs()),
        Observation::SupineToProne(o) => {
            score_supine_to_prone(o.rolled_side(), o.freed_arm(), o.reached_prone(), o.clean)
        }
        Observation::SitUps(o) => score_sit_ups(o.completed),
        Observation::SupineToSit(o) => {
            score_supine_to_sit(o.transitioned, o.struggled, o.duration.unwrap_or_default())
        }
        Observation::ArmRaise(o) => {
            score_arm_raise_height(o.above_shoulder, o.above_head, o.fully_extended)
        }
        Observation::ArmRaiseDuration(o) => score_arm_raise_duration(o.held_secs()),
        Observation::FloorSit(o) => score_floor_sit(o.reached_sit, o.hesitant),
        Observation::AllFours(o) => {
            score_all_fours(o.reached_all_fours(), o.raised_head(), o.crawled(), o.leg_lifted())
        }
        Observation::FloorRise(o) => score_floor_rise(o.stood_up, o.used_hands, o.struggled),
        Observation::ChairRise(o) => {
            score_chair_rise(o.stood_up, o.used_chair_side, o.used_thighs, o.struggled)
        }
        Observation::StoolStep(o) => {
            score_stool_step(o.attempted, o.used_support, o.used_thigh, o.completed)
        }
        Observation::PickUpObject(o) => {
            score_pick_up_object(o.attempted, o.heavy_support, o.light_support, o.completed)
        }
    };
    SubScore::new(value)
}
