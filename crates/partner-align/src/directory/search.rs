use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::alignment::{AlignmentContext, AlignmentEngine};
use super::domain::{normalize_token, FundingType, Organization, UnknownValue, VerificationStatus};

/// Ordering applied to ranked search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Alignment,
    Name,
    /// No timestamp is tracked, so recency keeps directory insertion order.
    Recency,
    Confidence,
}

impl FromStr for SortBy {
    type Err = UnknownValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize_token(raw).as_str() {
            "alignment" => Ok(SortBy::Alignment),
            "name" => Ok(SortBy::Name),
            "recency" => Ok(SortBy::Recency),
            "confidence" => Ok(SortBy::Confidence),
            _ => Err(UnknownValue {
                kind: "sort order",
                value: raw.to_string(),
            }),
        }
    }
}

/// Listing query. Blank values are treated as absent and unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SearchQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub focus_area: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub funding_type: Option<FundingType>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub verification_status: Option<VerificationStatus>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub sort_by: Option<SortBy>,
}

impl SearchQuery {
    /// Active filters expressed as a scoring context.
    pub fn context(&self) -> AlignmentContext {
        AlignmentContext {
            focus_areas: self.focus_area.iter().cloned().collect(),
            region: self.region.clone(),
            funding_type: self.funding_type,
        }
    }

    pub fn matches(&self, organization: &Organization) -> bool {
        if let Some(needle) = &self.q {
            let needle = needle.to_lowercase();
            let hit = contains_ignore_case(&organization.name, &needle)
                || contains_ignore_case(&organization.mission, &needle)
                || contains_ignore_case(&organization.description, &needle)
                || organization
                    .focus_areas
                    .iter()
                    .any(|area| contains_ignore_case(area, &needle));
            if !hit {
                return false;
            }
        }

        if let Some(focus_area) = &self.focus_area {
            if !organization.focus_areas.iter().any(|area| area == focus_area) {
                return false;
            }
        }

        if let Some(region) = &self.region {
            if !contains_ignore_case(&organization.region, &region.to_lowercase()) {
                return false;
            }
        }

        if self.funding_type.is_some() && organization.funding_type != self.funding_type {
            return false;
        }

        if let Some(status) = self.verification_status {
            if organization.verification_status != status {
                return false;
            }
        }

        true
    }
}

fn contains_ignore_case(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

/// Record paired with its contextual alignment score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredOrganization {
    #[serde(flatten)]
    pub organization: Organization,
    pub alignment_score: u8,
}

/// Filtered, scored and ordered listing plus facets drawn from the whole directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub results: Vec<ScoredOrganization>,
    pub total: usize,
    pub focus_areas: Vec<String>,
    pub regions: Vec<String>,
}

/// Filters `directory`, scores survivors against the active filters, and orders them.
pub fn rank(
    directory: &[Organization],
    query: &SearchQuery,
    engine: &AlignmentEngine,
) -> SearchResults {
    let context = query.context();
    let mut results: Vec<ScoredOrganization> = directory
        .iter()
        .filter(|organization| query.matches(organization))
        .map(|organization| ScoredOrganization {
            alignment_score: engine.contextual(organization, &context),
            organization: organization.clone(),
        })
        .collect();

    // All sorts are stable so ties keep directory order.
    match query.sort_by.unwrap_or_default() {
        SortBy::Alignment => results.sort_by_key(|entry| Reverse(entry.alignment_score)),
        SortBy::Name => results.sort_by(|a, b| a.organization.name.cmp(&b.organization.name)),
        SortBy::Recency => {}
        SortBy::Confidence => {
            results.sort_by_key(|entry| Reverse(entry.organization.confidence()))
        }
    }

    let (focus_areas, regions) = facets(directory);

    SearchResults {
        total: results.len(),
        results,
        focus_areas,
        regions,
    }
}

/// Sorted distinct focus areas and regions.
pub fn facets(directory: &[Organization]) -> (Vec<String>, Vec<String>) {
    let mut focus_areas = BTreeSet::new();
    let mut regions = BTreeSet::new();
    for organization in directory {
        focus_areas.extend(organization.focus_set());
        if organization.has_region() {
            regions.insert(organization.region.as_str());
        }
    }

    (
        focus_areas.into_iter().map(str::to_string).collect(),
        regions.into_iter().map(str::to_string).collect(),
    )
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
