//! CSV directory import used to seed the repository and drive the CLI.

mod mapping;
mod normalizer;
mod parser;

use super::domain::{Organization, OrganizationId};
use super::registration::{OrganizationSubmission, RegistrationError};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use parser::DirectoryRecord;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryImportError {
    #[error("failed to read directory export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid directory CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid organization on line {line}: {source}")]
    InvalidRow {
        line: u64,
        #[source]
        source: RegistrationError,
    },
    #[error("duplicate organization id '{id}' on line {line}")]
    DuplicateId { line: u64, id: OrganizationId },
}

pub struct DirectoryImporter;

impl DirectoryImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Organization>, DirectoryImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Rows without an id are numbered `org-NNNNNN` by their position in the file.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Organization>, DirectoryImportError> {
        let mut seen: HashSet<OrganizationId> = HashSet::new();
        let mut organizations = Vec::new();

        for (index, record) in parser::parse_records(reader)?.into_iter().enumerate() {
            let line = record.line;
            let organization = build_organization(record, index + 1)?;
            if !seen.insert(organization.id.clone()) {
                return Err(DirectoryImportError::DuplicateId {
                    line,
                    id: organization.id,
                });
            }
            organizations.push(organization);
        }

        Ok(organizations)
    }
}

fn build_organization(
    record: DirectoryRecord,
    position: usize,
) -> Result<Organization, DirectoryImportError> {
    let DirectoryRecord { line, row } = record;

    let submission = OrganizationSubmission {
        id: row.id,
        name: row.name.unwrap_or_default(),
        organization_type: row
            .organization_type
            .as_deref()
            .and_then(mapping::organization_type_for),
        focus_areas: row
            .focus_areas
            .as_deref()
            .map(normalizer::split_focus_areas)
            .unwrap_or_default(),
        region: row.region.unwrap_or_default(),
        mission: row.mission.unwrap_or_default(),
        description: row.description.unwrap_or_default(),
        funding_type: row.funding_type.as_deref().and_then(mapping::funding_type_for),
        verification_status: Some(mapping::verification_for(
            row.verification_status.as_deref(),
        )),
        confidence: Some(mapping::confidence_for(row.confidence.as_deref())),
    };

    let invalid = |source| DirectoryImportError::InvalidRow { line, source };
    let id = submission
        .requested_id()
        .map_err(invalid)?
        .unwrap_or_else(|| OrganizationId(format!("org-{position:06}")));
    submission.into_organization(id).map_err(invalid)
}
