use metrics_exporter_prometheus::PrometheusHandle;
use partner_align::config::DirectoryConfig;
use partner_align::directory::{
    DirectoryImporter, DirectoryService, Organization, OrganizationId, OrganizationRepository,
    RecordFilter, RepositoryError, UpsertOutcome,
};
use partner_align::error::AppError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-scoped directory store. Records keep their insertion order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryOrganizationRepository {
    inner: Arc<Mutex<DirectoryTable>>,
}

#[derive(Default)]
struct DirectoryTable {
    records: Vec<Organization>,
    positions: HashMap<OrganizationId, usize>,
}

impl InMemoryOrganizationRepository {
    fn table(&self) -> Result<MutexGuard<'_, DirectoryTable>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Unavailable("directory lock poisoned".to_string()))
    }
}

impl OrganizationRepository for InMemoryOrganizationRepository {
    fn get(&self, id: &OrganizationId) -> Result<Option<Organization>, RepositoryError> {
        let table = self.table()?;
        Ok(table
            .positions
            .get(id)
            .map(|&position| table.records[position].clone()))
    }

    fn list(&self, filter: &RecordFilter) -> Result<Vec<Organization>, RepositoryError> {
        let table = self.table()?;
        Ok(table
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    fn insert(&self, record: Organization) -> Result<(), RepositoryError> {
        let mut table = self.table()?;
        if table.positions.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }

        let position = table.records.len();
        table.positions.insert(record.id.clone(), position);
        table.records.push(record);
        Ok(())
    }

    fn upsert(&self, record: Organization) -> Result<UpsertOutcome, RepositoryError> {
        let mut table = self.table()?;
        if let Some(&position) = table.positions.get(&record.id) {
            table.records[position] = record;
            return Ok(UpsertOutcome::Updated);
        }

        let position = table.records.len();
        table.positions.insert(record.id.clone(), position);
        table.records.push(record);
        Ok(UpsertOutcome::Inserted)
    }
}

/// Builds the directory service, seeding it from `seed_csv` when given.
pub(crate) fn directory_service(
    config: &DirectoryConfig,
    seed_csv: Option<&Path>,
) -> Result<Arc<DirectoryService<InMemoryOrganizationRepository>>, AppError> {
    let repository = Arc::new(InMemoryOrganizationRepository::default());
    let service = DirectoryService::new(repository, config.alignment)
        .with_max_page_size(config.max_page_size);

    if let Some(path) = seed_csv {
        let organizations = DirectoryImporter::from_path(path)?;
        let loaded = service.seed(organizations)?;
        info!(path = %path.display(), loaded, "loaded directory seed");
    }

    Ok(Arc::new(service))
}
