use super::domain::{Organization, OrganizationId};

/// Selection applied by [`OrganizationRepository::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RecordFilter {
    #[default]
    All,
    Excluding(OrganizationId),
}

impl RecordFilter {
    pub fn matches(&self, organization: &Organization) -> bool {
        match self {
            RecordFilter::All => true,
            RecordFilter::Excluding(id) => &organization.id != id,
        }
    }
}

/// Result of an upsert so callers can tell registrations from edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Read/write access to the organization directory. `list` returns records in
/// insertion order; updates keep a record's original position.
pub trait OrganizationRepository: Send + Sync {
    fn get(&self, id: &OrganizationId) -> Result<Option<Organization>, RepositoryError>;
    fn list(&self, filter: &RecordFilter) -> Result<Vec<Organization>, RepositoryError>;
    /// Stores a new record. The existence check and the write happen atomically;
    /// an id that is already taken yields [`RepositoryError::Conflict`].
    fn insert(&self, record: Organization) -> Result<(), RepositoryError>;
    fn upsert(&self, record: Organization) -> Result<UpsertOutcome, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
