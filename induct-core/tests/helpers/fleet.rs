//! Domain object builders around a fixed planning date.

use crate::evaluation::{ConstraintEvaluator, EvaluationParams};
use crate::models::*;
use crate::utils::{DefaultRandom, Environment, Float};
use std::sync::Arc;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

/// The planning date all fixtures are anchored to.
pub const PLANNING_DATE: OffsetDateTime = datetime!(2025-09-15 0:00 UTC);

pub fn create_trainset(id: &str, fleet_number: u32) -> Trainset {
    Trainset {
        id: TrainsetId::new(id),
        fleet_number,
        current_bay: None,
        notes: String::new(),
    }
}

pub fn create_certificate(
    trainset: &str,
    subsystem: Subsystem,
    from_days: i64,
    until_days: i64,
    is_clear: bool,
) -> Certificate {
    Certificate {
        trainset: TrainsetId::new(trainset),
        subsystem,
        valid_from: PLANNING_DATE + Duration::days(from_days),
        valid_until: PLANNING_DATE + Duration::days(until_days),
        is_clear,
    }
}

/// Clear certificates for all three subsystems, valid from 90 days ago until `valid_for_days`
/// from the planning date.
pub fn create_clear_certificates(trainset: &str, valid_for_days: i64) -> Vec<Certificate> {
    [Subsystem::RollingStock, Subsystem::Signalling, Subsystem::Telecom]
        .into_iter()
        .map(|subsystem| create_certificate(trainset, subsystem, -90, valid_for_days, true))
        .collect()
}

pub fn create_job_card(
    id: &str,
    trainset: &str,
    severity: Severity,
    status: JobCardStatus,
) -> JobCard {
    JobCard {
        id: JobCardId::new(id),
        trainset: TrainsetId::new(trainset),
        severity,
        status,
        description: "brake pad wear".to_string(),
    }
}

pub fn create_mileage(trainset: &str, total_km: Float) -> MileageRecord {
    MileageRecord { trainset: TrainsetId::new(trainset), total_km }
}

pub fn create_contract(
    id: &str,
    trainset: &str,
    hours_required: Float,
    hours_exposed: Float,
    end_days: i64,
) -> BrandingContract {
    BrandingContract {
        id: ContractId::new(id),
        trainset: TrainsetId::new(trainset),
        advertiser: "Acme".to_string(),
        hours_required,
        hours_exposed,
        end_date: PLANNING_DATE + Duration::days(end_days),
    }
}

pub fn create_bay(id: &str, kind: BayKind, is_clean: bool) -> StablingBay {
    StablingBay {
        id: BayId::new(id),
        kind,
        is_clean,
        occupied_by: None,
        out_of_service: false,
    }
}

pub fn create_cleaning_slot(id: &str, capacity: u32) -> CleaningSlot {
    CleaningSlot {
        id: SlotId::new(id),
        starts_at: PLANNING_DATE + Duration::hours(1),
        ends_at: PLANNING_DATE + Duration::hours(5),
        capacity,
        assigned_to: None,
    }
}

pub fn trainset_name(idx: usize) -> String {
    format!("TS{:03}", idx + 1)
}

/// A snapshot of `count` fully eligible trainsets with one clean bay of every kind per
/// trainset and a two-train cleaning slot.
pub fn create_test_snapshot(count: usize) -> FleetSnapshot {
    create_snapshot_with_ineligible(count, &[])
}

/// Like [`create_test_snapshot`], but the listed trainset indices get an expired signalling
/// certificate and are not service eligible.
pub fn create_snapshot_with_ineligible(count: usize, ineligible: &[usize]) -> FleetSnapshot {
    let mut trainsets = Vec::new();
    let mut certificates = Vec::new();
    let mut mileage = Vec::new();
    let mut bays = Vec::new();

    for idx in 0..count {
        let id = trainset_name(idx);
        trainsets.push(create_trainset(&id, idx as u32 + 1));
        mileage.push(create_mileage(&id, 50_000. + idx as Float * 25.));

        if ineligible.contains(&idx) {
            certificates.push(create_certificate(&id, Subsystem::RollingStock, -90, 180, true));
            certificates.push(create_certificate(&id, Subsystem::Signalling, -90, -5, true));
            certificates.push(create_certificate(&id, Subsystem::Telecom, -90, 180, true));
        } else {
            certificates.extend(create_clear_certificates(&id, 180));
        }

        bays.push(create_bay(&format!("REV-{:02}", idx + 1), BayKind::Revenue, true));
        bays.push(create_bay(&format!("SB-{:02}", idx + 1), BayKind::Standby, true));
        bays.push(create_bay(&format!("INS-{:02}", idx + 1), BayKind::Inspection, true));
    }

    SnapshotBuilder::default()
        .with_trainsets(trainsets)
        .with_certificates(certificates)
        .with_mileage(mileage)
        .with_bays(bays)
        .with_cleaning_slots(vec![create_cleaning_slot("CS-01", 2)])
        .build(PLANNING_DATE)
        .expect("cannot build test snapshot")
}

/// Assigns every trainset to service in a revenue bay, collision-free.
pub fn all_service_assignments(snapshot: &FleetSnapshot) -> Vec<Assignment> {
    let revenue = snapshot.bays_of_kind(BayKind::Revenue);
    (0..snapshot.trainset_count())
        .map(|trainset| Assignment { trainset, state: TargetState::Service, bay: revenue[trainset] })
        .collect()
}

pub fn create_evaluator(snapshot: Arc<FleetSnapshot>, min_service_count: usize) -> ConstraintEvaluator {
    ConstraintEvaluator::new(
        snapshot,
        EvaluationParams { min_service_count, ..EvaluationParams::default() },
    )
}

/// A deterministic, silent environment.
pub fn create_test_environment(seed: u64) -> Arc<Environment> {
    Arc::new(Environment::new(
        Arc::new(DefaultRandom::new_with_seed(seed)),
        None,
        Arc::new(|_: &str| {}),
    ))
}

/// A candidate with the given objectives and `violation_count` synthetic violations.
pub fn create_candidate(objectives: [Float; 3], violation_count: usize) -> Candidate {
    Candidate::new(
        Vec::new(),
        ObjectiveVector {
            service_readiness: objectives[0],
            maintenance_cost: objectives[1],
            branding_exposure: objectives[2],
        },
        (0..violation_count)
            .map(|_| HardViolation::ServiceCountBelowMinimum { actual: 0, required: 1 })
            .collect(),
    )
}
