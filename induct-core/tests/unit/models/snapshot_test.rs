use super::*;
use crate::helpers::*;

fn single_trainset_snapshot(
    certificates: Vec<Certificate>,
    job_cards: Vec<JobCard>,
) -> FleetSnapshot {
    SnapshotBuilder::default()
        .with_trainsets(vec![create_trainset("TS001", 1)])
        .with_certificates(certificates)
        .with_job_cards(job_cards)
        .with_mileage(vec![create_mileage("TS001", 50_000.)])
        .with_bays(vec![create_bay("REV-01", BayKind::Revenue, true)])
        .build(PLANNING_DATE)
        .expect("cannot build snapshot")
}

#[test]
fn can_mark_fully_certified_trainset_eligible() {
    let snapshot = single_trainset_snapshot(create_clear_certificates("TS001", 180), vec![]);

    assert!(snapshot.eligibility(0).is_eligible());
    assert_eq!(snapshot.certificates(0).len(), 3);
    // certificates run from -90 to +180 days around the planning date
    assert!((snapshot.certificate_margin(0) - 2. / 3.).abs() < 1E-9);
}

#[test]
fn can_detect_expired_certificate() {
    let mut certificates = vec![
        create_certificate("TS001", Subsystem::RollingStock, -90, 180, true),
        create_certificate("TS001", Subsystem::Signalling, -90, -5, true),
        create_certificate("TS001", Subsystem::Telecom, -90, 180, true),
    ];
    let snapshot = single_trainset_snapshot(certificates.drain(..).collect(), vec![]);

    let eligibility = snapshot.eligibility(0);
    assert!(!eligibility.is_eligible());
    assert_eq!(eligibility.reasons.len(), 1);
    assert_eq!(eligibility.reasons[0].to_string(), "signalling certificate expired 2025-09-10");
    assert_eq!(snapshot.certificate_margin(0), 0.);
}

#[test]
fn can_detect_not_clear_certificate() {
    let mut certificates = create_clear_certificates("TS001", 180);
    certificates.push(create_certificate("TS001", Subsystem::Telecom, -30, 30, false));
    let snapshot = single_trainset_snapshot(certificates, vec![]);

    let eligibility = snapshot.eligibility(0);
    assert!(!eligibility.is_eligible());
    assert_eq!(eligibility.reasons[0].to_string(), "telecom certificate not clear");
}

#[test]
fn can_report_missing_certificate_without_history() {
    let snapshot = single_trainset_snapshot(
        vec![
            create_certificate("TS001", Subsystem::RollingStock, -90, 180, true),
            create_certificate("TS001", Subsystem::Signalling, -90, 180, true),
        ],
        vec![],
    );

    let eligibility = snapshot.eligibility(0);
    assert_eq!(eligibility.reasons[0].to_string(), "no telecom certificate on record");
}

#[test]
fn can_apply_job_card_status_rules() {
    let snapshot = single_trainset_snapshot(
        create_clear_certificates("TS001", 180),
        vec![
            create_job_card("JC-1", "TS001", Severity::Major, JobCardStatus::Open),
            create_job_card("JC-2", "TS001", Severity::Minor, JobCardStatus::InProgress),
            create_job_card("JC-3", "TS001", Severity::Critical, JobCardStatus::PendingReview),
            create_job_card("JC-4", "TS001", Severity::Critical, JobCardStatus::Closed),
        ],
    );

    // a critical card pending review does not block service, a closed card is dropped
    assert!(snapshot.eligibility(0).is_eligible());
    assert_eq!(snapshot.job_cards(0).len(), 3);
    assert_eq!(snapshot.open_card_cost(0), 3. + 1.);
}

#[test]
fn can_block_service_on_open_critical_card() {
    let snapshot = single_trainset_snapshot(
        create_clear_certificates("TS001", 180),
        vec![create_job_card("JC-1", "TS001", Severity::Critical, JobCardStatus::Open)],
    );

    let eligibility = snapshot.eligibility(0);
    assert!(!eligibility.is_eligible());
    assert_eq!(eligibility.reasons[0].to_string(), "open critical job card JC-1 (brake pad wear)");
}

#[test]
fn can_fail_on_missing_mileage() {
    let result = SnapshotBuilder::default()
        .with_trainsets(vec![create_trainset("TS001", 1), create_trainset("TS002", 2)])
        .with_mileage(vec![create_mileage("TS001", 50_000.)])
        .with_bays(vec![
            create_bay("B-1", BayKind::Revenue, true),
            create_bay("B-2", BayKind::Standby, true),
        ])
        .build(PLANNING_DATE);

    match result {
        Err(EngineError::DataIncomplete { trainset, missing }) => {
            assert_eq!(trainset, "TS002");
            assert_eq!(missing, "mileage record");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn can_fail_on_insufficient_bays() {
    let mut out_of_service = create_bay("B-2", BayKind::Standby, true);
    out_of_service.out_of_service = true;
    let mut blocked = create_bay("B-3", BayKind::Standby, true);
    blocked.occupied_by = Some(TrainsetId::new("GHOST"));

    let result = SnapshotBuilder::default()
        .with_trainsets(vec![create_trainset("TS001", 1), create_trainset("TS002", 2)])
        .with_mileage(vec![create_mileage("TS001", 1.), create_mileage("TS002", 2.)])
        .with_bays(vec![create_bay("B-1", BayKind::Revenue, true), out_of_service, blocked])
        .build(PLANNING_DATE);

    match result {
        Err(EngineError::DataIncomplete { trainset, .. }) => assert_eq!(trainset, "fleet"),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn can_compute_cleaning_capacity() {
    let mut taken = create_cleaning_slot("CS-2", 3);
    taken.assigned_to = Some(TrainsetId::new("TS001"));
    let mut past = create_cleaning_slot("CS-3", 5);
    past.starts_at = PLANNING_DATE - time::Duration::days(2);
    past.ends_at = PLANNING_DATE - time::Duration::days(1);

    let snapshot = SnapshotBuilder::default()
        .with_trainsets(vec![create_trainset("TS001", 1)])
        .with_certificates(create_clear_certificates("TS001", 180))
        .with_mileage(vec![create_mileage("TS001", 1.)])
        .with_bays(vec![create_bay("B-1", BayKind::Revenue, true)])
        .with_cleaning_slots(vec![create_cleaning_slot("CS-1", 2), taken, past])
        .build(PLANNING_DATE)
        .expect("cannot build snapshot");

    assert_eq!(snapshot.cleaning_capacity(), 2 + 2);
}

parameterized_test! {can_compute_branding_urgency, (required, exposed, end_days, expected), {
    let snapshot = SnapshotBuilder::default()
        .with_trainsets(vec![create_trainset("TS001", 1)])
        .with_certificates(create_clear_certificates("TS001", 180))
        .with_mileage(vec![create_mileage("TS001", 1.)])
        .with_contracts(vec![create_contract("BC-1", "TS001", required, exposed, end_days)])
        .with_bays(vec![create_bay("B-1", BayKind::Revenue, true)])
        .build(PLANNING_DATE)
        .expect("cannot build snapshot");

    assert_eq!(snapshot.branding_urgency(0), expected);
}}

can_compute_branding_urgency! {
    case_01_under_delivered: (100., 40., 30, 2.),
    case_02_fulfilled: (100., 100., 30, 0.),
    case_03_expired_with_deficit: (100., 40., -1, 9999.),
    case_04_over_exposed: (100., 120., 10, 0.),
}

#[test]
fn can_compute_branding_progress() {
    let snapshot = SnapshotBuilder::default()
        .with_trainsets(vec![create_trainset("TS001", 1), create_trainset("TS002", 2)])
        .with_certificates(create_clear_certificates("TS001", 180))
        .with_mileage(vec![create_mileage("TS001", 1.), create_mileage("TS002", 2.)])
        .with_contracts(vec![
            create_contract("BC-1", "TS001", 100., 50., 30),
            create_contract("BC-2", "TS001", 100., 150., 30),
        ])
        .with_bays(vec![
            create_bay("B-1", BayKind::Revenue, true),
            create_bay("B-2", BayKind::Standby, true),
        ])
        .build(PLANNING_DATE)
        .expect("cannot build snapshot");

    // progress is capped at 100 % per contract before averaging
    assert_eq!(snapshot.branding_progress(0), Some(0.75));
    assert_eq!(snapshot.branding_progress(1), None);
}
