use serde::{Deserialize, Serialize};

use super::domain::{
    FundingType, Organization, OrganizationId, OrganizationType, VerificationStatus,
};

/// Payload of the registration and edit forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSubmission {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub organization_type: Option<OrganizationType>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub mission: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub funding_type: Option<FundingType>,
    #[serde(default)]
    pub verification_status: Option<VerificationStatus>,
    #[serde(default)]
    pub confidence: Option<u8>,
}

/// Validation failures for submitted records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("organization name must not be empty")]
    MissingName,
    #[error("organization id must not be blank when supplied")]
    BlankId,
    #[error("submitted id '{body}' does not match organization '{path}'")]
    IdMismatch {
        path: OrganizationId,
        body: OrganizationId,
    },
}

impl OrganizationSubmission {
    /// Caller supplied id, if any. Blank ids are rejected.
    pub fn requested_id(&self) -> Result<Option<OrganizationId>, RegistrationError> {
        match self.id.as_deref().map(str::trim) {
            None => Ok(None),
            Some("") => Err(RegistrationError::BlankId),
            Some(id) => Ok(Some(OrganizationId(id.to_string()))),
        }
    }

    /// Validates the submission and builds the stored record under `id`.
    pub fn into_organization(self, id: OrganizationId) -> Result<Organization, RegistrationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(RegistrationError::MissingName);
        }

        Ok(Organization {
            id,
            name,
            organization_type: self.organization_type,
            focus_areas: normalize_focus_areas(self.focus_areas),
            region: self.region.trim().to_string(),
            mission: self.mission.trim().to_string(),
            description: self.description.trim().to_string(),
            funding_type: self.funding_type,
            verification_status: self.verification_status.unwrap_or_default(),
            confidence: self.confidence.unwrap_or(0).min(100),
        })
    }
}

/// Trims entries and drops blanks and repeats, keeping the first spelling seen.
pub(crate) fn normalize_focus_areas(areas: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(areas.len());
    for area in areas {
        let area = area.trim();
        if area.is_empty() || normalized.iter().any(|existing| existing == area) {
            continue;
        }
        normalized.push(area.to_string());
    }
    normalized
}
