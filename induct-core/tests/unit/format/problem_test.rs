use super::*;
use std::io::BufReader;

fn sample_problem_json() -> String {
    r#"{
        "planningDate": "2025-09-15T00:00:00Z",
        "trainsets": [
            {"trainsetId": "TS001", "fleetNumber": 1, "currentBay": "REV-01"},
            {"trainsetId": "TS002", "fleetNumber": 2, "notes": "fresh overhaul"}
        ],
        "fitnessCertificates": [
            {"trainsetId": "TS001", "subsystem": "Rolling-Stock", "validFrom": "2025-06-01T00:00:00Z", "validUntil": "2026-03-01T00:00:00Z", "isClear": true},
            {"trainsetId": "TS001", "subsystem": "Signalling", "validFrom": "2025-06-01T00:00:00Z", "validUntil": "2026-03-01T00:00:00Z", "isClear": true},
            {"trainsetId": "TS001", "subsystem": "Telecom", "validFrom": "2025-06-01T00:00:00Z", "validUntil": "2026-03-01T00:00:00Z", "isClear": true}
        ],
        "jobCards": [
            {"jobCardId": "JC-1", "trainsetId": "TS002", "severity": "Critical", "status": "Open", "description": "door actuator fault"}
        ],
        "mileage": [
            {"trainsetId": "TS001", "totalKm": 51000.5},
            {"trainsetId": "TS002", "totalKm": 48000.0}
        ],
        "brandingContracts": [
            {"contractId": "BC-1", "trainsetId": "TS001", "advertiser": "Acme", "contractualHoursRequired": 500.0, "hoursExposedToDate": 120.0, "endDate": "2025-12-31T00:00:00Z"}
        ],
        "stablingBays": [
            {"bayId": "REV-01", "bayType": "Revenue"},
            {"bayId": "SB-01", "bayType": "Standby", "isClean": false},
            {"bayId": "INS-01", "bayType": "Inspection", "outOfService": false}
        ],
        "cleaningSlots": [
            {"slotId": "CS-1", "startsAt": "2025-09-15T01:00:00Z", "endsAt": "2025-09-15T05:00:00Z", "capacity": 2}
        ],
        "options": {"mode": "fast", "minServiceCount": 1, "seed": 42, "unknownOption": true}
    }"#
    .to_string()
}

fn sample_problem() -> InductionProblem {
    deserialize_problem(BufReader::new(sample_problem_json().as_bytes()))
        .expect("cannot deserialize problem")
}

#[test]
fn can_deserialize_problem_with_defaults() {
    let problem = sample_problem();

    assert_eq!(problem.trainsets.len(), 2);
    assert_eq!(problem.trainsets[0].notes, "");
    assert_eq!(problem.trainsets[1].notes, "fresh overhaul");
    // cleanliness defaults to true, unknown option keys are ignored
    assert!(problem.stabling_bays[0].is_clean);
    assert!(!problem.stabling_bays[1].is_clean);
}

#[test]
fn can_build_snapshot_from_problem() {
    let snapshot = sample_problem().build_snapshot().expect("cannot build snapshot");

    assert_eq!(snapshot.trainset_count(), 2);
    assert!(snapshot.eligibility(0).is_eligible());
    // no certificates on record plus an open critical card
    assert!(!snapshot.eligibility(1).is_eligible());
    assert_eq!(snapshot.eligibility(1).reasons.len(), 4);
    assert_eq!(snapshot.mileage(0), 51000.5);
    assert_eq!(snapshot.cleaning_capacity(), 2);
    assert_eq!(snapshot.bays().len(), 3);
}

#[test]
fn can_resolve_solver_config() {
    let config = sample_problem().solver_config().expect("cannot resolve config");

    assert_eq!(config.mode, SearchMode::Fast);
    assert_eq!(config.min_service_count, 1);
    assert_eq!(config.seed, Some(42));
    // unset options keep their defaults
    assert_eq!(config.mutation_rate, 0.1);
    assert_eq!(config.max_runtime_seconds, None);
}

#[test]
fn can_use_defaults_without_options() {
    let mut problem = sample_problem();
    problem.options = None;

    let config = problem.solver_config().expect("cannot resolve config");

    assert_eq!(config.mode, SearchMode::Balanced);
    assert_eq!(config.min_service_count, 15);
}

#[test]
fn can_reject_unknown_mode() {
    let mut problem = sample_problem();
    problem.options.as_mut().unwrap().mode = Some("exhaustive".to_string());

    match problem.solver_config() {
        Err(EngineError::InvalidConfiguration(violations)) => {
            assert_eq!(violations[0].option, "mode");
        }
        _ => panic!("unknown mode was not rejected"),
    }
}

#[test]
fn can_reject_unknown_subsystem() {
    let mut problem = sample_problem();
    problem.fitness_certificates[0].subsystem = "Traction".to_string();

    match problem.build_snapshot() {
        Err(EngineError::DataIncomplete { trainset, missing }) => {
            assert_eq!(trainset, "TS001");
            assert!(missing.contains("Traction"));
        }
        _ => panic!("unknown subsystem was not rejected"),
    }
}

#[test]
fn can_reject_malformed_timestamp() {
    let mut problem = sample_problem();
    problem.planning_date = "tonight".to_string();

    match problem.build_snapshot() {
        Err(EngineError::DataIncomplete { missing, .. }) => {
            assert!(missing.contains("RFC 3339 planning date"));
        }
        _ => panic!("malformed timestamp was not rejected"),
    }
}

#[test]
fn can_reject_malformed_json() {
    let result = deserialize_problem(BufReader::new("{not json".as_bytes()));

    assert!(matches!(result, Err(EngineError::DataIncomplete { .. })));
}
