//! A frozen point-in-time view of the fleet used by exactly one optimization run. The snapshot
//! restricts the raw record sets to the planning date, indexes them per trainset and
//! precomputes the per-trainset values the evaluator needs, so the hot evaluation path is a
//! handful of sums. The snapshot is read-only for the whole run: source data changes mid-run
//! have no effect until the next snapshot is assembled.

#[cfg(test)]
#[path = "../../tests/unit/models/snapshot_test.rs"]
mod snapshot_test;

use crate::error::{EngineError, EngineResult};
use crate::models::fleet::*;
use crate::utils::Float;
use rustc_hash::FxHashMap;
use std::fmt;
use time::{Duration, OffsetDateTime};

/// A saturation value for the branding urgency of an expired, under-delivered contract.
const EXPIRED_CONTRACT_URGENCY: Float = 9999.;

/// Why a trainset cannot enter revenue service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IneligibilityReason {
    /// A subsystem certificate overlapping the planning date is not clear.
    CertificateNotClear {
        /// An affected subsystem.
        subsystem: Subsystem,
    },
    /// No certificate for the subsystem covers the planning date.
    CertificateExpired {
        /// An affected subsystem.
        subsystem: Subsystem,
        /// When the most recent certificate ran out, if one ever existed.
        expired_on: Option<OffsetDateTime>,
    },
    /// An open job card of critical severity.
    OpenCriticalJobCard {
        /// An offending job card.
        job_card: JobCardId,
        /// What the card is about.
        description: String,
    },
}

impl fmt::Display for IneligibilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CertificateNotClear { subsystem } => {
                write!(f, "{subsystem} certificate not clear")
            }
            Self::CertificateExpired { subsystem, expired_on: Some(date) } => {
                write!(f, "{subsystem} certificate expired {}", date.date())
            }
            Self::CertificateExpired { subsystem, expired_on: None } => {
                write!(f, "no {subsystem} certificate on record")
            }
            Self::OpenCriticalJobCard { job_card, description } => {
                write!(f, "open critical job card {job_card} ({description})")
            }
        }
    }
}

/// Service eligibility of a single trainset, precomputed during snapshot assembly. It biases
/// population initialization and feeds the recommendation rationale.
#[derive(Clone, Debug)]
pub struct ServiceEligibility {
    /// Reasons the trainset cannot be serviced; empty means eligible.
    pub reasons: Vec<IneligibilityReason>,
}

impl ServiceEligibility {
    /// Returns true if the trainset may be assigned to revenue service.
    pub fn is_eligible(&self) -> bool {
        self.reasons.is_empty()
    }
}

/// An immutable planning snapshot. See the module docs for the restriction rules.
pub struct FleetSnapshot {
    planning_date: OffsetDateTime,
    trainsets: Vec<Trainset>,
    certificates: Vec<Vec<Certificate>>,
    job_cards: Vec<Vec<JobCard>>,
    contracts: Vec<Vec<BrandingContract>>,
    bays: Vec<StablingBay>,
    bays_by_kind: FxHashMap<BayKind, Vec<usize>>,
    cleaning_capacity: u32,

    // per-trainset precomputed values, all indexed like `trainsets`
    mileage: Vec<Float>,
    eligibility: Vec<ServiceEligibility>,
    certificate_margin: Vec<Float>,
    open_card_cost: Vec<Float>,
    branding_progress: Vec<Option<Float>>,
    branding_urgency: Vec<Float>,
}

impl FleetSnapshot {
    /// Returns the planning date the snapshot was assembled for.
    pub fn planning_date(&self) -> OffsetDateTime {
        self.planning_date
    }

    /// Returns the number of trainsets.
    pub fn trainset_count(&self) -> usize {
        self.trainsets.len()
    }

    /// Returns all trainsets in stable index order.
    pub fn trainsets(&self) -> &[Trainset] {
        &self.trainsets
    }

    /// Returns a trainset by its snapshot index.
    pub fn trainset(&self, idx: usize) -> &Trainset {
        &self.trainsets[idx]
    }

    /// Returns all usable bays in stable index order.
    pub fn bays(&self) -> &[StablingBay] {
        &self.bays
    }

    /// Returns a bay by its snapshot index.
    pub fn bay(&self, idx: usize) -> &StablingBay {
        &self.bays[idx]
    }

    /// Returns indices of usable bays of the given kind.
    pub fn bays_of_kind(&self, kind: BayKind) -> &[usize] {
        self.bays_by_kind.get(&kind).map(|indices| indices.as_slice()).unwrap_or(&[])
    }

    /// Returns free cleaning capacity of the planning night.
    pub fn cleaning_capacity(&self) -> u32 {
        self.cleaning_capacity
    }

    /// Returns certificates of a trainset overlapping the planning date.
    pub fn certificates(&self, idx: usize) -> &[Certificate] {
        &self.certificates[idx]
    }

    /// Returns not-yet-closed job cards of a trainset.
    pub fn job_cards(&self, idx: usize) -> &[JobCard] {
        &self.job_cards[idx]
    }

    /// Returns branding contracts of a trainset.
    pub fn contracts(&self, idx: usize) -> &[BrandingContract] {
        &self.contracts[idx]
    }

    /// Returns service eligibility of a trainset.
    pub fn eligibility(&self, idx: usize) -> &ServiceEligibility {
        &self.eligibility[idx]
    }

    /// Returns the certificate margin of a trainset: the smallest remaining validity fraction
    /// across its clear certificates, in `[0, 1]`. Zero for ineligible trainsets.
    pub fn certificate_margin(&self, idx: usize) -> Float {
        self.certificate_margin[idx]
    }

    /// Returns accumulated mileage of a trainset in kilometres.
    pub fn mileage(&self, idx: usize) -> Float {
        self.mileage[idx]
    }

    /// Returns mileage of all trainsets, indexed like `trainsets`.
    pub fn mileage_all(&self) -> &[Float] {
        &self.mileage
    }

    /// Returns the summed severity cost of a trainset's open job cards.
    pub fn open_card_cost(&self, idx: usize) -> Float {
        self.open_card_cost[idx]
    }

    /// Returns mean capped exposure progress over the trainset's contracts, `None` when the
    /// trainset carries no branding.
    pub fn branding_progress(&self, idx: usize) -> Option<Float> {
        self.branding_progress[idx]
    }

    /// Returns branding urgency: exposure deficit per remaining contract day, saturating for
    /// expired under-delivered contracts.
    pub fn branding_urgency(&self, idx: usize) -> Float {
        self.branding_urgency[idx]
    }
}

/// Assembles a [`FleetSnapshot`] from raw record sets and a target planning date.
#[derive(Default)]
pub struct SnapshotBuilder {
    trainsets: Vec<Trainset>,
    certificates: Vec<Certificate>,
    job_cards: Vec<JobCard>,
    mileage: Vec<MileageRecord>,
    contracts: Vec<BrandingContract>,
    bays: Vec<StablingBay>,
    cleaning_slots: Vec<CleaningSlot>,
}

impl SnapshotBuilder {
    /// Sets trainset records.
    pub fn with_trainsets(mut self, trainsets: Vec<Trainset>) -> Self {
        self.trainsets = trainsets;
        self
    }

    /// Sets certificate records.
    pub fn with_certificates(mut self, certificates: Vec<Certificate>) -> Self {
        self.certificates = certificates;
        self
    }

    /// Sets job card records.
    pub fn with_job_cards(mut self, job_cards: Vec<JobCard>) -> Self {
        self.job_cards = job_cards;
        self
    }

    /// Sets mileage records.
    pub fn with_mileage(mut self, mileage: Vec<MileageRecord>) -> Self {
        self.mileage = mileage;
        self
    }

    /// Sets branding contract records.
    pub fn with_contracts(mut self, contracts: Vec<BrandingContract>) -> Self {
        self.contracts = contracts;
        self
    }

    /// Sets stabling bay records.
    pub fn with_bays(mut self, bays: Vec<StablingBay>) -> Self {
        self.bays = bays;
        self
    }

    /// Sets cleaning slot records.
    pub fn with_cleaning_slots(mut self, cleaning_slots: Vec<CleaningSlot>) -> Self {
        self.cleaning_slots = cleaning_slots;
        self
    }

    /// Builds the snapshot for the given planning date.
    ///
    /// Fails with [`EngineError::DataIncomplete`] when a trainset lacks a mileage record or
    /// when fewer usable bays than trainsets remain after filtering.
    pub fn build(self, planning_date: OffsetDateTime) -> EngineResult<FleetSnapshot> {
        let Self { trainsets, certificates, job_cards, mileage, contracts, bays, cleaning_slots } = self;

        let index: FxHashMap<&TrainsetId, usize> =
            trainsets.iter().enumerate().map(|(idx, trainset)| (&trainset.id, idx)).collect();
        let count = trainsets.len();

        // records referencing unknown trainsets are dropped, matching the storage contract
        let mut certs_by_trainset: Vec<Vec<Certificate>> = vec![Vec::new(); count];
        let mut all_certs_by_trainset: Vec<Vec<Certificate>> = vec![Vec::new(); count];
        for certificate in certificates {
            if let Some(&idx) = index.get(&certificate.trainset) {
                let overlaps =
                    certificate.valid_from <= planning_date && planning_date <= certificate.valid_until;
                if overlaps {
                    certs_by_trainset[idx].push(certificate.clone());
                }
                all_certs_by_trainset[idx].push(certificate);
            }
        }

        let mut cards_by_trainset: Vec<Vec<JobCard>> = vec![Vec::new(); count];
        for card in job_cards {
            if let Some(&idx) = index.get(&card.trainset) {
                if card.status != JobCardStatus::Closed {
                    cards_by_trainset[idx].push(card);
                }
            }
        }

        let mut mileage_by_trainset: Vec<Option<Float>> = vec![None; count];
        for record in mileage {
            if let Some(&idx) = index.get(&record.trainset) {
                mileage_by_trainset[idx] = Some(record.total_km);
            }
        }

        let mut contracts_by_trainset: Vec<Vec<BrandingContract>> = vec![Vec::new(); count];
        for contract in contracts {
            if let Some(&idx) = index.get(&contract.trainset) {
                contracts_by_trainset[idx].push(contract);
            }
        }

        // a missing mileage record is reported, not defaulted: a made-up value would bias
        // the balancing objective
        let mileage = trainsets
            .iter()
            .zip(mileage_by_trainset)
            .map(|(trainset, km)| {
                km.ok_or_else(|| EngineError::DataIncomplete {
                    trainset: trainset.id.to_string(),
                    missing: "mileage record".to_string(),
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let bays: Vec<StablingBay> = bays
            .into_iter()
            .filter(|bay| !bay.out_of_service)
            .filter(|bay| match &bay.occupied_by {
                // a bay held by a trainset outside the snapshot stays blocked for the night
                Some(occupant) => index.contains_key(occupant),
                None => true,
            })
            .collect();

        if bays.len() < count {
            return Err(EngineError::DataIncomplete {
                trainset: "fleet".to_string(),
                missing: format!("usable stabling bays ({} bays for {count} trainsets)", bays.len()),
            });
        }

        let mut bays_by_kind: FxHashMap<BayKind, Vec<usize>> = FxHashMap::default();
        for (idx, bay) in bays.iter().enumerate() {
            bays_by_kind.entry(bay.kind).or_default().push(idx);
        }

        let night_end = planning_date + Duration::days(1);
        let cleaning_capacity = cleaning_slots
            .iter()
            .filter(|slot| slot.starts_at < night_end && slot.ends_at > planning_date)
            .map(|slot| slot.capacity.saturating_sub(u32::from(slot.assigned_to.is_some())))
            .sum();

        let eligibility = (0..count)
            .map(|idx| {
                compute_eligibility(
                    planning_date,
                    &certs_by_trainset[idx],
                    &all_certs_by_trainset[idx],
                    &cards_by_trainset[idx],
                )
            })
            .collect::<Vec<_>>();

        let certificate_margin = (0..count)
            .map(|idx| {
                if eligibility[idx].is_eligible() {
                    compute_certificate_margin(planning_date, &certs_by_trainset[idx])
                } else {
                    0.
                }
            })
            .collect();

        let open_card_cost = cards_by_trainset
            .iter()
            .map(|cards| {
                cards
                    .iter()
                    .filter(|card| card.status.is_open())
                    .map(|card| card.severity.cost_weight())
                    .sum()
            })
            .collect();

        let branding_progress = contracts_by_trainset
            .iter()
            .map(|contracts| {
                if contracts.is_empty() {
                    None
                } else {
                    Some(contracts.iter().map(BrandingContract::progress).sum::<Float>() / contracts.len() as Float)
                }
            })
            .collect();

        let branding_urgency = contracts_by_trainset
            .iter()
            .map(|contracts| contracts.iter().map(|contract| contract_urgency(planning_date, contract)).sum())
            .collect();

        Ok(FleetSnapshot {
            planning_date,
            trainsets,
            certificates: certs_by_trainset,
            job_cards: cards_by_trainset,
            contracts: contracts_by_trainset,
            bays,
            bays_by_kind,
            cleaning_capacity,
            mileage,
            eligibility,
            certificate_margin,
            open_card_cost,
            branding_progress,
            branding_urgency,
        })
    }
}

fn compute_eligibility(
    planning_date: OffsetDateTime,
    overlapping: &[Certificate],
    all: &[Certificate],
    cards: &[JobCard],
) -> ServiceEligibility {
    let mut reasons = Vec::new();

    for subsystem in [Subsystem::RollingStock, Subsystem::Signalling, Subsystem::Telecom] {
        let current = overlapping.iter().filter(|cert| cert.subsystem == subsystem).collect::<Vec<_>>();

        if current.is_empty() {
            let expired_on = all
                .iter()
                .filter(|cert| cert.subsystem == subsystem && cert.valid_until < planning_date)
                .map(|cert| cert.valid_until)
                .max();
            reasons.push(IneligibilityReason::CertificateExpired { subsystem, expired_on });
        } else if current.iter().any(|cert| !cert.is_clear) {
            reasons.push(IneligibilityReason::CertificateNotClear { subsystem });
        }
    }

    reasons.extend(
        cards
            .iter()
            .filter(|card| card.status.is_open() && card.severity == Severity::Critical)
            .map(|card| IneligibilityReason::OpenCriticalJobCard {
                job_card: card.id.clone(),
                description: card.description.clone(),
            }),
    );

    ServiceEligibility { reasons }
}

fn compute_certificate_margin(planning_date: OffsetDateTime, certificates: &[Certificate]) -> Float {
    certificates
        .iter()
        .filter(|cert| cert.is_clear)
        .map(|cert| {
            let total = (cert.valid_until - cert.valid_from).as_seconds_f64();
            let remaining = (cert.valid_until - planning_date).as_seconds_f64();
            if total <= 0. {
                0.
            } else {
                (remaining / total).clamp(0., 1.)
            }
        })
        .fold(Float::INFINITY, Float::min)
        .min(1.)
        .max(0.)
}

fn contract_urgency(planning_date: OffsetDateTime, contract: &BrandingContract) -> Float {
    let deficit = (contract.hours_required - contract.hours_exposed).max(0.);
    if deficit == 0. {
        return 0.;
    }

    let remaining_days = (contract.end_date - planning_date).whole_days();
    if remaining_days <= 0 {
        EXPIRED_CONTRACT_URGENCY
    } else {
        deficit / remaining_days as Float
    }
}
