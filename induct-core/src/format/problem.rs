//! Problem input: the seven record sets plus optional run options, read from JSON.

#[cfg(test)]
#[path = "../../tests/unit/format/problem_test.rs"]
mod problem_test;

use crate::error::{ConfigViolation, EngineError, EngineResult};
use crate::models::*;
use crate::solver::config::{ObjectiveWeights, SearchMode, SolverConfig};
use crate::utils::Float;
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Read};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// A trainset roster entry.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainsetRecord {
    /// A trainset id.
    pub trainset_id: String,
    /// A fleet number.
    pub fleet_number: u32,
    /// A bay the trainset is currently stabled in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_bay: Option<String>,
    /// Free-form operational notes.
    #[serde(default)]
    pub notes: String,
}

/// A subsystem fitness certificate.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    /// A trainset id.
    pub trainset_id: String,
    /// A certified subsystem: `Rolling-Stock`, `Signalling` or `Telecom`.
    pub subsystem: String,
    /// Validity window start as RFC 3339.
    pub valid_from: String,
    /// Validity window end as RFC 3339.
    pub valid_until: String,
    /// Whether the certificate is clear for service.
    pub is_clear: bool,
}

/// A maintenance job card entry.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCardRecord {
    /// A job card id.
    pub job_card_id: String,
    /// A trainset id.
    pub trainset_id: String,
    /// A severity: `Critical`, `Major` or `Minor`.
    pub severity: String,
    /// A workflow status: `Open`, `In Progress`, `Pending Review` or `Closed`.
    pub status: String,
    /// What the card is about.
    #[serde(default)]
    pub description: String,
}

/// A cumulative mileage entry.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MileageEntryRecord {
    /// A trainset id.
    pub trainset_id: String,
    /// Accumulated mileage in kilometres.
    pub total_km: Float,
}

/// An exterior branding contract entry.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    /// A contract id.
    pub contract_id: String,
    /// A trainset id.
    pub trainset_id: String,
    /// An advertiser name.
    pub advertiser: String,
    /// Contracted exposure hours.
    pub contractual_hours_required: Float,
    /// Exposure hours accrued so far.
    pub hours_exposed_to_date: Float,
    /// Contract end date as RFC 3339.
    pub end_date: String,
}

/// A stabling bay entry.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BayRecord {
    /// A bay id.
    pub bay_id: String,
    /// A bay type: `Revenue`, `Standby` or `Inspection`.
    pub bay_type: String,
    /// Whether the bay was cleaned; defaults to true.
    #[serde(default = "default_true")]
    pub is_clean: bool,
    /// A trainset currently blocking the bay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupied_by: Option<String>,
    /// Whether the bay is excluded by maintenance.
    #[serde(default)]
    pub out_of_service: bool,
}

/// A cleaning slot entry.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningSlotRecord {
    /// A slot id.
    pub slot_id: String,
    /// Slot window start as RFC 3339.
    pub starts_at: String,
    /// Slot window end as RFC 3339.
    pub ends_at: String,
    /// How many trainsets the slot can clean.
    pub capacity: u32,
    /// A trainset the slot is already booked for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

/// Objective weights for the weighted-sum recommendation pick.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightsRecord {
    /// A service readiness weight.
    pub service_readiness: Float,
    /// A maintenance cost weight.
    pub maintenance_cost: Float,
    /// A branding exposure weight.
    pub branding_exposure: Float,
}

/// Optional run options embedded in the problem file.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsRecord {
    /// A search mode: `fast`, `balanced` or `thorough`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// A population size override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population_size: Option<usize>,
    /// A generation budget override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_generations: Option<usize>,
    /// A minimum revenue service count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_service_count: Option<usize>,
    /// A wall-clock limit in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_runtime_seconds: Option<Float>,
    /// An offspring mutation probability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutation_rate: Option<Float>,
    /// Objective weights for the recommendation pick.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective_weights: Option<WeightsRecord>,
    /// A seed for reproducible runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// The whole problem file.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InductionProblem {
    /// A target planning date as RFC 3339.
    pub planning_date: String,
    /// Trainset roster records.
    pub trainsets: Vec<TrainsetRecord>,
    /// Fitness certificate records.
    #[serde(default)]
    pub fitness_certificates: Vec<CertificateRecord>,
    /// Job card records.
    #[serde(default)]
    pub job_cards: Vec<JobCardRecord>,
    /// Mileage records.
    #[serde(default)]
    pub mileage: Vec<MileageEntryRecord>,
    /// Branding contract records.
    #[serde(default)]
    pub branding_contracts: Vec<ContractRecord>,
    /// Stabling bay records.
    pub stabling_bays: Vec<BayRecord>,
    /// Cleaning slot records.
    #[serde(default)]
    pub cleaning_slots: Vec<CleaningSlotRecord>,
    /// Optional run options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionsRecord>,
}

fn default_true() -> bool {
    true
}

/// Reads a problem from JSON.
pub fn deserialize_problem<R: Read>(reader: BufReader<R>) -> EngineResult<InductionProblem> {
    serde_json::from_reader(reader).map_err(|err| EngineError::DataIncomplete {
        trainset: "fleet".to_string(),
        missing: format!("well-formed problem JSON ({err})"),
    })
}

impl InductionProblem {
    /// Assembles the planning snapshot from the record sets.
    pub fn build_snapshot(&self) -> EngineResult<FleetSnapshot> {
        let planning_date = parse_timestamp(&self.planning_date, "fleet", "planning date")?;

        let trainsets = self
            .trainsets
            .iter()
            .map(|record| Trainset {
                id: TrainsetId::new(&record.trainset_id),
                fleet_number: record.fleet_number,
                current_bay: record.current_bay.as_deref().map(BayId::new),
                notes: record.notes.clone(),
            })
            .collect();

        let certificates = self
            .fitness_certificates
            .iter()
            .map(|record| {
                Ok(Certificate {
                    trainset: TrainsetId::new(&record.trainset_id),
                    subsystem: parse_subsystem(&record.subsystem, &record.trainset_id)?,
                    valid_from: parse_timestamp(&record.valid_from, &record.trainset_id, "certificate start")?,
                    valid_until: parse_timestamp(&record.valid_until, &record.trainset_id, "certificate end")?,
                    is_clear: record.is_clear,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let job_cards = self
            .job_cards
            .iter()
            .map(|record| {
                Ok(JobCard {
                    id: JobCardId::new(&record.job_card_id),
                    trainset: TrainsetId::new(&record.trainset_id),
                    severity: parse_severity(&record.severity, &record.trainset_id)?,
                    status: parse_status(&record.status, &record.trainset_id)?,
                    description: record.description.clone(),
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let mileage = self
            .mileage
            .iter()
            .map(|record| MileageRecord {
                trainset: TrainsetId::new(&record.trainset_id),
                total_km: record.total_km,
            })
            .collect();

        let contracts = self
            .branding_contracts
            .iter()
            .map(|record| {
                Ok(BrandingContract {
                    id: ContractId::new(&record.contract_id),
                    trainset: TrainsetId::new(&record.trainset_id),
                    advertiser: record.advertiser.clone(),
                    hours_required: record.contractual_hours_required,
                    hours_exposed: record.hours_exposed_to_date,
                    end_date: parse_timestamp(&record.end_date, &record.trainset_id, "contract end")?,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let bays = self
            .stabling_bays
            .iter()
            .map(|record| {
                Ok(StablingBay {
                    id: BayId::new(&record.bay_id),
                    kind: parse_bay_kind(&record.bay_type, &record.bay_id)?,
                    is_clean: record.is_clean,
                    occupied_by: record.occupied_by.as_deref().map(TrainsetId::new),
                    out_of_service: record.out_of_service,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let cleaning_slots = self
            .cleaning_slots
            .iter()
            .map(|record| {
                Ok(CleaningSlot {
                    id: SlotId::new(&record.slot_id),
                    starts_at: parse_timestamp(&record.starts_at, &record.slot_id, "slot start")?,
                    ends_at: parse_timestamp(&record.ends_at, &record.slot_id, "slot end")?,
                    capacity: record.capacity,
                    assigned_to: record.assigned_to.as_deref().map(TrainsetId::new),
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        SnapshotBuilder::default()
            .with_trainsets(trainsets)
            .with_certificates(certificates)
            .with_job_cards(job_cards)
            .with_mileage(mileage)
            .with_contracts(contracts)
            .with_bays(bays)
            .with_cleaning_slots(cleaning_slots)
            .build(planning_date)
    }

    /// Resolves the embedded options into a run configuration. Missing options fall back to
    /// defaults, a bad mode string fails validation.
    pub fn solver_config(&self) -> EngineResult<SolverConfig> {
        let defaults = SolverConfig::default();
        let Some(options) = &self.options else { return Ok(defaults) };

        let mode = match options.mode.as_deref() {
            None => defaults.mode,
            Some("fast") => SearchMode::Fast,
            Some("balanced") => SearchMode::Balanced,
            Some("thorough") => SearchMode::Thorough,
            Some(other) => {
                return Err(EngineError::InvalidConfiguration(vec![ConfigViolation::new(
                    "mode",
                    format!("is '{other}'"),
                    "use one of 'fast', 'balanced', 'thorough'",
                )]))
            }
        };

        Ok(SolverConfig {
            mode,
            population_size: options.population_size,
            max_generations: options.max_generations,
            min_service_count: options.min_service_count.unwrap_or(defaults.min_service_count),
            max_runtime_seconds: options.max_runtime_seconds,
            mutation_rate: options.mutation_rate.unwrap_or(defaults.mutation_rate),
            objective_weights: options.objective_weights.as_ref().map(|weights| ObjectiveWeights {
                service_readiness: weights.service_readiness,
                maintenance_cost: weights.maintenance_cost,
                branding_exposure: weights.branding_exposure,
            }),
            seed: options.seed,
        })
    }
}

fn parse_timestamp(value: &str, subject: &str, what: &str) -> EngineResult<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|_| EngineError::DataIncomplete {
        trainset: subject.to_string(),
        missing: format!("RFC 3339 {what} (got '{value}')"),
    })
}

fn parse_subsystem(value: &str, trainset: &str) -> EngineResult<Subsystem> {
    match value {
        "Rolling-Stock" => Ok(Subsystem::RollingStock),
        "Signalling" => Ok(Subsystem::Signalling),
        "Telecom" => Ok(Subsystem::Telecom),
        _ => Err(unknown_value(trainset, "subsystem", value)),
    }
}

fn parse_severity(value: &str, trainset: &str) -> EngineResult<Severity> {
    match value {
        "Critical" => Ok(Severity::Critical),
        "Major" => Ok(Severity::Major),
        "Minor" => Ok(Severity::Minor),
        _ => Err(unknown_value(trainset, "severity", value)),
    }
}

fn parse_status(value: &str, trainset: &str) -> EngineResult<JobCardStatus> {
    match value {
        "Open" => Ok(JobCardStatus::Open),
        "In Progress" => Ok(JobCardStatus::InProgress),
        "Pending Review" => Ok(JobCardStatus::PendingReview),
        "Closed" => Ok(JobCardStatus::Closed),
        _ => Err(unknown_value(trainset, "job card status", value)),
    }
}

fn parse_bay_kind(value: &str, bay: &str) -> EngineResult<BayKind> {
    match value {
        "Revenue" => Ok(BayKind::Revenue),
        "Standby" => Ok(BayKind::Standby),
        "Inspection" => Ok(BayKind::Inspection),
        _ => Err(unknown_value(bay, "bay type", value)),
    }
}

fn unknown_value(subject: &str, what: &str, value: &str) -> EngineError {
    EngineError::DataIncomplete {
        trainset: subject.to_string(),
        missing: format!("known {what} (got '{value}')"),
    }
}
