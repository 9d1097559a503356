use std::time::Duration;

use cmas_core::observation::{HoldObservation, Observation, StoolStepObservation};
use cmas_core::{BatteryResult, SubScore, TestId};
use cmas_rubric::error::RubricError;
use cmas_rubric::scoring::*;
use cmas_rubric::{battery_total, collect_entries, score, total};

#[test]
fn hold_bands_have_exact_edges() {
    let cases = [
        (0.0, 0),
        (0.999, 0),
        (1.0, 1),
        (9.999, 1),
        (10.0, 2),
        (29.999, 2),
        (30.0, 3),
        (59.999, 3),
        (60.0, 4),
        (118.0, 4),
        (119.999, 4),
        (120.0, 5),
        (600.0, 5),
    ];
    for (seconds, expected) in cases {
        assert_eq!(score_head_elevation(seconds), expected, "head at {seconds}s");
        assert_eq!(score_leg_lift_duration(seconds), expected, "leg at {seconds}s");
    }
}

#[test]
fn arm_hold_tops_out_at_sixty_seconds() {
    assert_eq!(score_arm_raise_duration(0.999), 0);
    assert_eq!(score_arm_raise_duration(1.0), 1);
    assert_eq!(score_arm_raise_duration(10.0), 2);
    assert_eq!(score_arm_raise_duration(30.0), 3);
    assert_eq!(score_arm_raise_duration(59.999), 3);
    assert_eq!(score_arm_raise_duration(60.0), 4);
    assert_eq!(score_arm_raise_duration(65.0), 4);
}

#[test]
fn duration_scores_never_decrease() {
    let mut prev = (0, 0);
    for ms in (0..130_000).step_by(7) {
        let s = f64::from(ms) / 1000.0;
        let now = (score_head_elevation(s), score_arm_raise_duration(s));
        assert!(now.0 >= prev.0 && now.1 >= prev.1, "dropped at {s}s");
        prev = now;
    }
}

#[test]
fn four_step_checklists_stop_at_first_unmet_condition() {
    type Checklist = fn(bool, bool, bool, bool) -> u8;
    let lists: [(&str, Checklist, [u8; 5]); 2] = [
        ("all fours", score_all_fours, [0, 1, 2, 3, 4]),
        ("chair rise", |a, b, c, d| score_chair_rise(a, !b, !c, !d), [0, 1, 2, 3, 4]),
    ];
    for (name, f, expected) in lists {
        assert_eq!(f(true, true, true, true), expected[4], "{name} all met");
        for unmet in 0..4 {
            let mut conds = [true; 4];
            conds[unmet] = false;
            assert_eq!(
                f(conds[0], conds[1], conds[2], conds[3]),
                expected[unmet],
                "{name} with condition {unmet} unmet"
            );
        }
    }
}

#[test]
fn leg_raise_checklist() {
    assert_eq!(score_leg_raise(false, true), 0);
    assert_eq!(score_leg_raise(true, false), 1);
    assert_eq!(score_leg_raise(true, true), 2);
}

#[test]
fn supine_to_prone_checklist() {
    assert_eq!(score_supine_to_prone(false, true, true, true), 0);
    assert_eq!(score_supine_to_prone(true, false, true, true), 1);
    assert_eq!(score_supine_to_prone(true, true, false, true), 1);
    assert_eq!(score_supine_to_prone(true, true, true, false), 2);
    assert_eq!(score_supine_to_prone(true, true, true, true), 3);
}

#[test]
fn supine_to_sit_duration_bands() {
    let ms = Duration::from_millis;
    assert_eq!(score_supine_to_sit(false, false, ms(100)), 0);
    assert_eq!(score_supine_to_sit(true, true, ms(100)), 1);
    assert_eq!(score_supine_to_sit(true, false, ms(7001)), 1);
    assert_eq!(score_supine_to_sit(true, false, ms(7000)), 2);
    assert_eq!(score_supine_to_sit(true, false, ms(4001)), 2);
    assert_eq!(score_supine_to_sit(true, false, ms(4000)), 3);
}

#[test]
fn arm_raise_height_checklist() {
    assert_eq!(score_arm_raise_height(false, true, true), 0);
    assert_eq!(score_arm_raise_height(true, false, true), 1);
    assert_eq!(score_arm_raise_height(true, true, false), 2);
    assert_eq!(score_arm_raise_height(true, true, true), 3);
}

#[test]
fn floor_sit_skips_one() {
    assert_eq!(score_floor_sit(false, false), 0);
    assert_eq!(score_floor_sit(true, true), 2);
    assert_eq!(score_floor_sit(true, false), 3);
}

#[test]
fn floor_rise_checklist() {
    assert_eq!(score_floor_rise(false, false, false), 0);
    assert_eq!(score_floor_rise(true, true, true), 2);
    assert_eq!(score_floor_rise(true, false, true), 3);
    assert_eq!(score_floor_rise(true, false, false), 4);
}

#[test]
fn stool_step_checklist() {
    assert_eq!(score_stool_step(false, true, true, true), 0);
    assert_eq!(score_stool_step(true, true, false, true), 1);
    assert_eq!(score_stool_step(true, false, true, true), 2);
    assert_eq!(score_stool_step(true, false, false, true), 3);
}

#[test]
fn stool_step_unfinished_attempt_falls_back_to_one() {
    // Scores below the "used thigh" branch even though no support was seen.
    assert_eq!(score_stool_step(true, false, false, false), 1);
    assert!(score_stool_step(true, false, false, false) < score_stool_step(true, false, true, false));

    let obs = Observation::StoolStep(StoolStepObservation {
        attempted: true,
        used_support: false,
        used_thigh: false,
        completed: false,
    });
    assert_eq!(score(&obs), SubScore::new(1));
}

#[test]
fn pick_up_requires_completion() {
    assert_eq!(score_pick_up_object(true, false, false, false), 0);
    assert_eq!(score_pick_up_object(false, false, false, true), 0);
    assert_eq!(score_pick_up_object(true, true, true, true), 1);
    assert_eq!(score_pick_up_object(true, false, true, true), 2);
    assert_eq!(score_pick_up_object(true, false, false, true), 3);
}

#[test]
fn sit_ups_clamp_to_six() {
    assert_eq!(score_sit_ups(0), 0);
    assert_eq!(score_sit_ups(4), 4);
    assert_eq!(score_sit_ups(6), 6);
    assert_eq!(score_sit_ups(7), 6);
    assert_eq!(score_sit_ups(u32::MAX), 6);
}

#[test]
fn observation_dispatch_uses_the_matching_table() {
    let hold = HoldObservation {
        onset_at: Some(Duration::from_secs(2)),
        released_at: None,
        held: Duration::from_secs(65),
    };
    assert_eq!(score(&Observation::HeadElevation(hold)), SubScore::new(4));
    assert_eq!(score(&Observation::LegLiftDuration(hold)), SubScore::new(4));
    assert_eq!(score(&Observation::ArmRaiseDuration(hold)), SubScore::new(4));

    let short = HoldObservation {
        held: Duration::from_millis(999),
        ..hold
    };
    assert_eq!(score(&Observation::HeadElevation(short)), SubScore::ZERO);
}

#[test]
fn total_is_a_plain_sum() {
    let scores = TestId::ALL.map(|t| SubScore::new(t.max_score()));
    assert_eq!(total(&scores), 52);
    assert_eq!(total(&[SubScore::ZERO; 14]), 0);
}

#[test]
fn partial_battery_has_no_total() {
    let mut result = BatteryResult::new();
    for test in &TestId::ALL[..13] {
        result.record(*test, SubScore::new(1)).unwrap();
    }
    assert_eq!(battery_total(&result), None);
    assert_eq!(result.partial_sum(), 13);

    result.record(TestId::PickUpObject, SubScore::new(3)).unwrap();
    assert_eq!(battery_total(&result), Some(16));
}

#[test]
fn collect_entries_rejects_bad_input() {
    let entry = |test, value| ScoreEntry { test, value };

    let result = collect_entries(&[entry(TestId::HeadElevation, 5), entry(TestId::LegRaise, 2)])
        .unwrap();
    assert_eq!(result.len(), 2);

    assert!(matches!(
        collect_entries(&[entry(TestId::LegRaise, 3)]),
        Err(RubricError::Validation(_))
    ));
    assert!(matches!(
        collect_entries(&[entry(TestId::SitUps, 2), entry(TestId::SitUps, 3)]),
        Err(RubricError::Duplicate(TestId::SitUps))
    ));
}
