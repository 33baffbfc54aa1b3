use super::*;
use crate::helpers::*;
use crate::models::{Assignment, BayKind};
use std::sync::Arc;

#[test]
fn can_return_none_without_feasible_members() {
    let snapshot = create_test_snapshot(2);
    let front = vec![create_candidate([10., 1., 1.], 1)];

    assert!(recommend(&front, &snapshot, &Scalarization::IdealPoint).is_none());
    assert!(recommend(&[], &snapshot, &Scalarization::IdealPoint).is_none());
}

#[test]
fn can_pick_compromise_with_ideal_point() {
    let snapshot = create_test_snapshot(2);
    // extremes are best in one objective only, the middle member is closest to the ideal
    let front = vec![
        create_candidate([10., 10., 0.], 0),
        create_candidate([9., 2., 0.], 0),
        create_candidate([1., 1., 0.], 0),
    ];

    let recommendation =
        recommend(&front, &snapshot, &Scalarization::IdealPoint).expect("no recommendation");

    assert_eq!(recommendation.objectives.service_readiness, 9.);
    assert_eq!(recommendation.objectives.maintenance_cost, 2.);
}

#[test]
fn can_respect_objective_weights() {
    let snapshot = create_test_snapshot(2);
    let front = vec![
        create_candidate([10., 10., 0.], 0),
        create_candidate([9., 2., 0.], 0),
        create_candidate([1., 1., 0.], 0),
    ];
    let weights = ObjectiveWeights {
        service_readiness: 1.,
        maintenance_cost: 0.,
        branding_exposure: 0.,
    };

    let recommendation = recommend(&front, &snapshot, &Scalarization::WeightedSum(weights))
        .expect("no recommendation");

    assert_eq!(recommendation.objectives.service_readiness, 10.);
}

#[test]
fn can_explain_service_assignment() {
    let snapshot = Arc::new(create_test_snapshot(3));
    let evaluator = create_evaluator(snapshot.clone(), 2);
    let candidate = evaluator.evaluate(all_service_assignments(&snapshot));

    let recommendation = recommend(&[candidate], &snapshot, &Scalarization::IdealPoint)
        .expect("no recommendation");

    assert_eq!(recommendation.assignments.len(), 3);
    let advice = &recommendation.assignments[0];
    assert_eq!(advice.trainset_id, "TS001");
    assert_eq!(advice.state, TargetState::Service);
    assert!(advice.bay_id.starts_with("REV-"));
    assert!(advice.rationale[0].contains("clear certificates"));
}

#[test]
fn can_explain_exclusion_from_service() {
    let snapshot = Arc::new(create_snapshot_with_ineligible(3, &[0]));
    let evaluator = create_evaluator(snapshot.clone(), 2);

    let standby_bay = snapshot.bays_of_kind(BayKind::Standby)[0];
    let mut assignments = all_service_assignments(&snapshot);
    assignments[0] = Assignment { trainset: 0, state: TargetState::Standby, bay: standby_bay };
    let candidate = evaluator.evaluate(assignments);
    assert!(candidate.is_feasible());

    let recommendation = recommend(&[candidate], &snapshot, &Scalarization::IdealPoint)
        .expect("no recommendation");

    let advice = &recommendation.assignments[0];
    assert_eq!(advice.state, TargetState::Standby);
    assert_eq!(
        advice.rationale[0],
        "excluded from service: signalling certificate expired 2025-09-10"
    );
}

#[test]
fn can_sort_advice_by_trainset_id() {
    let snapshot = Arc::new(create_test_snapshot(3));
    let evaluator = create_evaluator(snapshot.clone(), 2);
    let candidate = evaluator.evaluate(all_service_assignments(&snapshot));

    let recommendation = recommend(&[candidate], &snapshot, &Scalarization::IdealPoint)
        .expect("no recommendation");

    let ids: Vec<&str> =
        recommendation.assignments.iter().map(|advice| advice.trainset_id.as_str()).collect();
    assert_eq!(ids, vec!["TS001", "TS002", "TS003"]);
}
