use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::directory::alignment::AlignmentConfig;
use crate::directory::domain::{
    FundingType, Organization, OrganizationId, OrganizationType, VerificationStatus,
};
use crate::directory::registration::OrganizationSubmission;
use crate::directory::repository::{
    OrganizationRepository, RecordFilter, RepositoryError, UpsertOutcome,
};
use crate::directory::service::DirectoryService;

#[allow(clippy::too_many_arguments)]
pub(super) fn organization(
    id: &str,
    name: &str,
    organization_type: OrganizationType,
    focus_areas: &[&str],
    region: &str,
    funding_type: FundingType,
    verification_status: VerificationStatus,
    confidence: u8,
) -> Organization {
    Organization {
        id: OrganizationId::from(id),
        name: name.to_string(),
        organization_type: Some(organization_type),
        focus_areas: focus_areas.iter().map(|area| area.to_string()).collect(),
        region: region.to_string(),
        mission: format!("{name} mission"),
        description: String::new(),
        funding_type: Some(funding_type),
        verification_status,
        confidence,
    }
}

pub(super) fn pragati() -> Organization {
    let mut record = organization(
        "ngo-pragati",
        "Pragati Trust",
        OrganizationType::Ngo,
        &["Education", "Livelihood"],
        "Northern India",
        FundingType::Recipient,
        VerificationStatus::Verified,
        92,
    );
    record.mission = "Bridge schools for first-generation learners".to_string();
    record
}

pub(super) fn vidya() -> Organization {
    organization(
        "fdn-vidya",
        "Vidya Foundation",
        OrganizationType::Foundation,
        &["Education"],
        "Northern India",
        FundingType::Grant,
        VerificationStatus::Verified,
        88,
    )
}

pub(super) fn jal() -> Organization {
    let mut record = organization(
        "se-jal",
        "Jal Seva Enterprises",
        OrganizationType::SocialEnterprise,
        &["Water", "Health"],
        "Western India",
        FundingType::Mixed,
        VerificationStatus::Pending,
        64,
    );
    record.description = "Community water ATMs".to_string();
    record
}

pub(super) fn launchpad() -> Organization {
    organization(
        "inc-launchpad",
        "Ankur Launchpad",
        OrganizationType::Incubator,
        &["Livelihood", "Health", "Technology"],
        "Southern India",
        FundingType::Provider,
        VerificationStatus::Unverified,
        75,
    )
}

pub(super) fn directory() -> Vec<Organization> {
    vec![pragati(), vidya(), jal(), launchpad()]
}

pub(super) fn submission(name: &str) -> OrganizationSubmission {
    OrganizationSubmission {
        name: name.to_string(),
        organization_type: Some(OrganizationType::Csr),
        focus_areas: vec!["Education".to_string(), "Health".to_string()],
        region: "Northern India".to_string(),
        mission: "Employee volunteering for schools".to_string(),
        funding_type: Some(FundingType::Grant),
        verification_status: Some(VerificationStatus::Verified),
        confidence: Some(81),
        ..OrganizationSubmission::default()
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<Vec<Organization>>>,
}

impl MemoryRepository {
    pub(super) fn seeded(records: Vec<Organization>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl OrganizationRepository for MemoryRepository {
    fn get(&self, id: &OrganizationId) -> Result<Option<Organization>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn list(&self, filter: &RecordFilter) -> Result<Vec<Organization>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    fn insert(&self, record: Organization) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record);
        Ok(())
    }

    fn upsert(&self, record: Organization) -> Result<UpsertOutcome, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => {
                *existing = record;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                guard.push(record);
                Ok(UpsertOutcome::Inserted)
            }
        }
    }
}

pub(super) struct UnavailableRepository;

impl OrganizationRepository for UnavailableRepository {
    fn get(&self, _id: &OrganizationId) -> Result<Option<Organization>, RepositoryError> {
        Err(RepositoryError::Unavailable("directory offline".to_string()))
    }

    fn list(&self, _filter: &RecordFilter) -> Result<Vec<Organization>, RepositoryError> {
        Err(RepositoryError::Unavailable("directory offline".to_string()))
    }

    fn insert(&self, _record: Organization) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("directory offline".to_string()))
    }

    fn upsert(&self, _record: Organization) -> Result<UpsertOutcome, RepositoryError> {
        Err(RepositoryError::Unavailable("directory offline".to_string()))
    }
}

/// Holds every `get` and `insert` at a barrier so concurrent callers interleave
/// between the existence check and the write.
pub(super) struct GatedRepository {
    inner: MemoryRepository,
    gate: Barrier,
}

impl GatedRepository {
    pub(super) fn new(inner: MemoryRepository, parties: usize) -> Self {
        Self {
            inner,
            gate: Barrier::new(parties),
        }
    }
}

impl OrganizationRepository for GatedRepository {
    fn get(&self, id: &OrganizationId) -> Result<Option<Organization>, RepositoryError> {
        self.gate.wait();
        self.inner.get(id)
    }

    fn list(&self, filter: &RecordFilter) -> Result<Vec<Organization>, RepositoryError> {
        self.inner.list(filter)
    }

    fn insert(&self, record: Organization) -> Result<(), RepositoryError> {
        self.gate.wait();
        self.inner.insert(record)
    }

    fn upsert(&self, record: Organization) -> Result<UpsertOutcome, RepositoryError> {
        self.inner.upsert(record)
    }
}

pub(super) fn build_service() -> (DirectoryService<MemoryRepository>, MemoryRepository) {
    let repository = MemoryRepository::seeded(directory());
    let service = DirectoryService::new(Arc::new(repository.clone()), AlignmentConfig::default());
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json")
}
