use std::time::Duration;

use super::*;

fn progress() -> SearchProgress {
    SearchProgress {
        runtime: Duration::from_millis(250),
        steps: 100,
        steps_since_improvement: 10,
        time_since_improvement: Duration::from_millis(40),
        best_value: Some(42.0),
        minimizing: false,
    }
}

#[test]
fn max_runtime_triggers_at_the_limit() {
    let progress = progress();
    assert!(!MaxRuntime::seconds(1).should_stop(&progress));
    assert!(MaxRuntime::millis(250).should_stop(&progress));
    assert!(MaxRuntime::millis(100).should_stop(&progress));
}

#[test]
fn max_steps_triggers_at_the_limit() {
    let progress = progress();
    assert!(!MaxSteps::new(101).should_stop(&progress));
    assert!(MaxSteps::new(100).should_stop(&progress));
}

#[test]
fn unimproved_steps_trigger_at_the_limit() {
    let progress = progress();
    assert!(!MaxStepsWithoutImprovement::new(11).should_stop(&progress));
    assert!(MaxStepsWithoutImprovement::new(10).should_stop(&progress));
}

#[test]
fn target_respects_the_direction() {
    let mut progress = progress();
    assert!(TargetEvaluation::new(42.0).should_stop(&progress));
    assert!(TargetEvaluation::new(40.0).should_stop(&progress));
    assert!(!TargetEvaluation::new(50.0).should_stop(&progress));

    progress.minimizing = true;
    assert!(TargetEvaluation::new(50.0).should_stop(&progress));
    assert!(!TargetEvaluation::new(40.0).should_stop(&progress));
}

#[test]
fn target_never_triggers_without_a_best() {
    let mut progress = progress();
    progress.best_value = None;
    assert!(!TargetEvaluation::new(0.0).should_stop(&progress));
}

#[test]
fn unimproved_time_triggers_at_the_limit() {
    let progress = progress();
    assert!(!MaxTimeWithoutImprovement::millis(50).should_stop(&progress));
    assert!(MaxTimeWithoutImprovement::millis(40).should_stop(&progress));
}

#[test]
fn any_criterion_stops_when_one_child_does() {
    let progress = progress();
    let any = AnyCriterion::new(vec![
        Box::new(MaxSteps::new(1000)),
        Box::new(MaxRuntime::millis(100)),
    ]);
    assert!(any.should_stop(&progress));
    let none = AnyCriterion::new(vec![Box::new(MaxSteps::new(1000))]);
    assert!(!none.should_stop(&progress));
}

#[test]
fn all_criteria_require_every_child() {
    let progress = progress();
    let all = AllCriteria::new(vec![
        Box::new(MaxSteps::new(100)),
        Box::new(MaxRuntime::millis(100)),
    ]);
    assert!(all.should_stop(&progress));
    let partial = AllCriteria::new(vec![
        Box::new(MaxSteps::new(100)),
        Box::new(MaxRuntime::seconds(10)),
    ]);
    assert!(!partial.should_stop(&progress));
    assert!(!AllCriteria::new(Vec::new()).should_stop(&progress));
}
