use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::alignment::{AlignmentConfig, AlignmentEngine, AlignmentResult};
use super::domain::{Organization, OrganizationId};
use super::recommendation::{paginate, rank_partners, RecommendationPage, RecommendationRequest};
use super::registration::{OrganizationSubmission, RegistrationError};
use super::repository::{OrganizationRepository, RecordFilter, RepositoryError, UpsertOutcome};
use super::search::{rank, SearchQuery, SearchResults};

pub const DEFAULT_MAX_PAGE_SIZE: usize = 50;

/// Service composing the directory repository and the alignment engine.
pub struct DirectoryService<R> {
    repository: Arc<R>,
    engine: AlignmentEngine,
    max_page_size: usize,
    sequence: AtomicU64,
}

impl<R> DirectoryService<R>
where
    R: OrganizationRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: AlignmentConfig) -> Self {
        Self {
            repository,
            engine: AlignmentEngine::new(config),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            sequence: AtomicU64::new(1),
        }
    }

    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size.max(1);
        self
    }

    pub fn engine(&self) -> &AlignmentEngine {
        &self.engine
    }

    /// Register a new organization from the submission form.
    pub fn register(
        &self,
        submission: OrganizationSubmission,
    ) -> Result<Organization, DirectoryServiceError> {
        let requested = submission.requested_id()?;
        let id = match requested.clone() {
            Some(id) => id,
            None => self.next_free_id()?,
        };

        let mut record = submission.into_organization(id).inspect_err(|err| {
            warn!(error = %err, "rejected organization submission");
        })?;

        loop {
            match self.repository.insert(record.clone()) {
                Ok(()) => break,
                Err(RepositoryError::Conflict) if requested.is_none() => {
                    record.id = self.next_free_id()?;
                }
                Err(err) => return Err(err.into()),
            }
        }

        info!(id = %record.id, name = %record.name, "registered organization");
        Ok(record)
    }

    /// Replace an existing record with an edited submission. An id in the body
    /// must match the record being edited.
    pub fn update(
        &self,
        id: &OrganizationId,
        submission: OrganizationSubmission,
    ) -> Result<Organization, DirectoryServiceError> {
        if let Some(submitted) = submission.requested_id()? {
            if &submitted != id {
                return Err(RegistrationError::IdMismatch {
                    path: id.clone(),
                    body: submitted,
                }
                .into());
            }
        }

        if self.repository.get(id)?.is_none() {
            return Err(RepositoryError::NotFound.into());
        }

        let record = submission.into_organization(id.clone())?;
        match self.repository.upsert(record.clone())? {
            UpsertOutcome::Updated => {
                info!(id = %record.id, "updated organization");
                Ok(record)
            }
            UpsertOutcome::Inserted => Err(RepositoryError::NotFound.into()),
        }
    }

    /// Load already-normalized records, e.g. from a directory import.
    pub fn seed<I>(&self, records: I) -> Result<usize, DirectoryServiceError>
    where
        I: IntoIterator<Item = Organization>,
    {
        let mut loaded = 0;
        for record in records {
            self.repository.upsert(record)?;
            loaded += 1;
        }
        info!(loaded, "seeded organization directory");
        Ok(loaded)
    }

    pub fn get(&self, id: &OrganizationId) -> Result<Organization, DirectoryServiceError> {
        let record = self.repository.get(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Filter, score and order the directory for a listing query.
    pub fn search(&self, query: &SearchQuery) -> Result<SearchResults, DirectoryServiceError> {
        let directory = self.repository.list(&RecordFilter::All)?;
        let results = rank(&directory, query, &self.engine);
        debug!(
            corpus = directory.len(),
            matched = results.total,
            "ranked directory search"
        );
        Ok(results)
    }

    /// Partners for the requested organization, best pairwise score first.
    pub fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<RecommendationPage, DirectoryServiceError> {
        let RecommendationRequest {
            org_id,
            limit,
            offset,
        } = request;

        let target = self.get(&OrganizationId(org_id.clone()))?;
        let candidates = self
            .repository
            .list(&RecordFilter::Excluding(target.id.clone()))?;
        let ranked = rank_partners(&target, candidates, &self.engine);
        let page = paginate(org_id, ranked, limit, offset, self.max_page_size);

        debug!(
            org_id = %page.org_id,
            total = page.total,
            returned = page.results.len(),
            "computed recommendations"
        );
        Ok(page)
    }

    /// Pairwise alignment between two stored organizations.
    pub fn align(
        &self,
        a: &OrganizationId,
        b: &OrganizationId,
    ) -> Result<AlignmentResult, DirectoryServiceError> {
        let a = self.get(a)?;
        let b = self.get(b)?;
        Ok(self.engine.pairwise(&a, &b))
    }

    fn next_free_id(&self) -> Result<OrganizationId, RepositoryError> {
        loop {
            let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
            let id = OrganizationId(format!("org-{sequence:06}"));
            if self.repository.get(&id)?.is_none() {
                return Ok(id);
            }
        }
    }
}

/// Error raised by the directory service.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryServiceError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
