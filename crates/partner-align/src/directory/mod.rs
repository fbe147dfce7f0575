//! Organization directory: records, alignment scoring, search ranking,
//! recommendations and the HTTP surface over them.

pub mod alignment;
pub mod domain;
pub mod import;
pub mod recommendation;
pub mod registration;
pub mod repository;
pub mod router;
pub mod search;
pub mod service;

#[cfg(test)]
mod tests;

pub use alignment::{
    AlignmentConfig, AlignmentContext, AlignmentEngine, AlignmentFactor, AlignmentResult,
    ConfidencePolicy, ScoreComponent,
};
pub use domain::{
    FundingType, Organization, OrganizationId, OrganizationType, UnknownValue,
    VerificationStatus,
};
pub use import::{DirectoryImportError, DirectoryImporter};
pub use recommendation::{Recommendation, RecommendationPage, RecommendationRequest};
pub use registration::{OrganizationSubmission, RegistrationError};
pub use repository::{OrganizationRepository, RecordFilter, RepositoryError, UpsertOutcome};
pub use router::directory_router;
pub use search::{ScoredOrganization, SearchQuery, SearchResults, SortBy};
pub use service::{DirectoryService, DirectoryServiceError};
