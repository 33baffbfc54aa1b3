use super::*;
use crate::helpers::create_candidate;

#[test]
fn can_extract_rank_zero_front() {
    let population = vec![
        create_candidate([10., 3., 1.], 0),
        create_candidate([10., 5., 1.], 0),
        create_candidate([12., 3., 1.], 0),
        create_candidate([7., 6., 1.], 0),
    ];

    let front = pareto_front(&population);

    assert_eq!(front.len(), 1);
    assert_eq!(front[0].objectives().service_readiness, 12.);
}

#[test]
fn can_keep_feasible_front_over_infeasible_population() {
    let population = vec![
        create_candidate([100., 0., 100.], 2),
        create_candidate([1., 50., 0.], 0),
    ];

    let front = pareto_front(&population);

    assert_eq!(front.len(), 1);
    assert!(front[0].is_feasible());
}

#[test]
fn can_compute_objective_stats() {
    let front = vec![
        create_candidate([10., 2., 0.], 0),
        create_candidate([20., 4., 0.], 1),
        create_candidate([30., 6., 0.], 0),
    ];

    let metrics = analyze_front(&front);

    assert_eq!(metrics.front_size, 3);
    assert_eq!(metrics.feasible_count, 2);
    assert_eq!(
        metrics.objectives[0],
        ObjectiveStats { min: 10., max: 30., mean: 20. }
    );
    assert_eq!(metrics.objectives[1], ObjectiveStats { min: 2., max: 6., mean: 4. });
    assert_eq!(metrics.objectives[2], ObjectiveStats { min: 0., max: 0., mean: 0. });
}

#[test]
fn can_compute_diversity_for_two_member_front() {
    let front = vec![
        create_candidate([10., 2., 0.], 0),
        create_candidate([30., 6., 0.], 0),
    ];

    let metrics = analyze_front(&front);

    // both live objectives span their full range, the degenerate one contributes nothing
    assert!((metrics.diversity - 2f64.sqrt()).abs() < 1E-9);
}

#[test]
fn can_report_zero_diversity_for_degenerate_fronts() {
    let singleton = vec![create_candidate([10., 2., 0.], 0)];
    assert_eq!(analyze_front(&singleton).diversity, 0.);

    let identical = vec![
        create_candidate([10., 2., 0.], 0),
        create_candidate([10., 2., 0.], 0),
    ];
    assert_eq!(analyze_front(&identical).diversity, 0.);

    assert_eq!(analyze_front(&[]).front_size, 0);
    assert_eq!(analyze_front(&[]).diversity, 0.);
}
