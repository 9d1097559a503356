//! Test dispatch and the battery runner.

use cmas_core::observation::Observation;
use cmas_core::{BatteryResult, ReportEntry, SubScore, TestId};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::BatteryConfig;
use crate::detector::run_detector;
use crate::detectors::{
    all_fours::AllFoursDetector,
    arm_raise::ArmRaiseDetector,
    chair_rise::ChairRiseDetector,
    floor_rise::FloorRiseDetector,
    floor_sit::FloorSitDetector,
    hold::{ArmHoldDetector, HeadElevationDetector, LegLiftDetector},
    leg_raise::LegRaiseDetector,
    pick_up::PickUpDetector,
    sit_ups::SitUpDetector,
    stool_step::StoolStepDetector,
    supine_to_prone::SupineToProneDetector,
    supine_to_sit::SupineToSitDetector,
};
use crate::error::PoseError;
use crate::source::FrameSource;

/// One test's observation together with its rubric score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scored {
    pub observation: Observation,
    pub score: SubScore,
}

impl Scored {
    pub fn test(&self) -> TestId {
        self.observation.test()
    }

    pub fn report_entry(&self) -> ReportEntry {
        let test = self.test();
        ReportEntry {
            test,
            name: test.name().to_string(),
            score: self.score,
            max_score: test.max_score(),
            observation: self.observation,
        }
    }
}

/// Scores from a battery run, in the order the tests were run.
#[derive(Debug, Clone, Default)]
pub struct BatteryRun {
    pub result: BatteryResult,
    pub scored: Vec<Scored>,
}

/// Run a single test against `source` and score it.
#[instrument(skip_all, fields(test = %test))]
pub async fn run_test<S: FrameSource>(
    test: TestId,
    source: &mut S,
    config: &BatteryConfig,
) -> Result<Scored, PoseError> {
    let observation = match test {
        TestId::HeadElevation => Observation::HeadElevation(
            run_detector(
                source,
                HeadElevationDetector::head_elevation(config.head_elevation.clone()),
            )
            .await?,
        ),
        TestId::LegRaise => Observation::LegRaise(
            run_detector(source, LegRaiseDetector::new(config.leg_raise.clone())).await?,
        ),
        TestId::LegLiftDuration => Observation::LegLiftDuration(
            run_detector(
                source,
                LegLiftDetector::leg_lift(config.leg_lift_duration.clone()),
            )
            .await?,
        ),
        TestId::SupineToProne => Observation::SupineToProne(
            run_detector(
                source,
                SupineToProneDetector::new(config.supine_to_prone.clone()),
            )
            .await?,
        ),
        TestId::SitUps => Observation::SitUps(
            run_detector(source, SitUpDetector::new(config.sit_ups.clone())).await?,
        ),
        TestId::SupineToSit => Observation::SupineToSit(
            run_detector(source, SupineToSitDetector::new(config.supine_to_sit.clone())).await?,
        ),
        TestId::ArmRaise => Observation::ArmRaise(
            run_detector(source, ArmRaiseDetector::new(config.arm_raise.clone())).await?,
        ),
        TestId::ArmRaiseDuration => Observation::ArmRaiseDuration(
            run_detector(
                source,
                ArmHoldDetector::arm_hold(config.arm_raise_duration.clone()),
            )
            .await?,
        ),
        TestId::FloorSit => Observation::FloorSit(
            run_detector(source, FloorSitDetector::new(config.floor_sit.clone())).await?,
        ),
        TestId::AllFours => Observation::AllFours(
            run_detector(source, AllFoursDetector::new(config.all_fours.clone())).await?,
        ),
        TestId::FloorRise => Observation::FloorRise(
            run_detector(source, FloorRiseDetector::new(config.floor_rise.clone())).await?,
        ),
        TestId::ChairRise => Observation::ChairRise(
            run_detector(source, ChairRiseDetector::new(config.chair_rise.clone())).await?,
        ),
        TestId::StoolStep => Observation::StoolStep(
            run_detector(source, StoolStepDetector::new(config.stool_step.clone())).await?,
        ),
        TestId::PickUpObject => Observation::PickUpObject(
            run_detector(source, PickUpDetector::new(config.pick_up_object.clone())).await?,
        ),
    };

    debug!(?observation, "final observation");

    let score = cmas_rubric::score(&observation);
    let score = SubScore::for_test(test, score.value())?;
    info!(score = score.value(), max = test.max_score(), "test scored");

    Ok(Scored { observation, score })
}

/// Run the given tests in order, one at a time.
pub async fn run_tests<S: FrameSource>(
    tests: &[TestId],
    source: &mut S,
    config: &BatteryConfig,
) -> Result<BatteryRun, PoseError> {
    config.validate()?;

    let mut run = BatteryRun::default();
    for &test in tests {
        let scored = run_test(test, source, config).await?;
        run.result.record(test, scored.score)?;
        run.scored.push(scored);
        info!(
            completed = run.result.len(),
            of = tests.len(),
            partial_sum = run.result.partial_sum(),
            "battery progress"
        );
    }
    Ok(run)
}

/// Run all fourteen tests in battery order.
pub async fn run_battery<S: FrameSource>(
    source: &mut S,
    config: &BatteryConfig,
) -> Result<BatteryRun, PoseError> {
    run_tests(&TestId::ALL, source, config).await
}
