use serde::{Deserialize, Serialize};

use super::super::domain::{FundingType, Organization};
use super::clamp_score;
use super::config::ConfidencePolicy;

const CONTEXT_BASE: i32 = 50;

/// Caller preferences or active search filters an organization is scored against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentContext {
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub funding_type: Option<FundingType>,
}

impl AlignmentContext {
    /// A context is active as soon as any preference is non-empty.
    pub fn is_active(&self) -> bool {
        self.has_focus() || self.region_filter().is_some() || self.funding_type.is_some()
    }

    fn has_focus(&self) -> bool {
        self.focus_areas.iter().any(|area| !area.trim().is_empty())
    }

    fn region_filter(&self) -> Option<&str> {
        self.region
            .as_deref()
            .map(str::trim)
            .filter(|region| !region.is_empty())
    }
}

/// Query-independent score reflecting the richness and trust of a record.
pub(crate) fn base_score(organization: &Organization) -> u8 {
    let mut score = CONTEXT_BASE;
    score += (organization.focus_set().len() as i32 * 5).min(20);
    if organization.has_region() {
        score += 10;
    }
    if organization.is_verified() {
        score += 10;
    }
    score += (10.0 * f64::from(organization.confidence()) / 100.0).round() as i32;
    clamp_score(score)
}

pub(crate) fn score_in_context(
    organization: &Organization,
    context: &AlignmentContext,
    confidence_policy: ConfidencePolicy,
) -> u8 {
    if !context.is_active() {
        return base_score(organization);
    }

    let mut score = CONTEXT_BASE;
    let focus = organization.focus_set();

    if context.has_focus() {
        if context
            .focus_areas
            .iter()
            .any(|area| focus.contains(area.as_str()))
        {
            score += 20;
        }
    } else {
        score += (focus.len() as i32 * 4).min(15);
    }

    match context.region_filter() {
        Some(region) => {
            if organization
                .region
                .to_lowercase()
                .contains(&region.to_lowercase())
            {
                score += 15;
            }
        }
        None => {
            if organization.has_region() {
                score += 8;
            }
        }
    }

    if context.funding_type.is_some() && context.funding_type == organization.funding_type {
        score += 10;
    }

    if organization.is_verified() {
        score += 5;
    }

    clamp_score(confidence_policy.apply(score, organization.confidence()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::domain::VerificationStatus;

    fn rich_record() -> Organization {
        let mut record = Organization::new("org-1", "Rich Record");
        record.focus_areas = vec!["Education".to_string(), "Health".to_string()];
        record.region = "Northern India".to_string();
        record.verification_status = VerificationStatus::Verified;
        record.funding_type = Some(FundingType::Grant);
        record.confidence = 80;
        record
    }

    #[test]
    fn empty_context_falls_back_to_base_score() {
        let record = rich_record();
        let context = AlignmentContext {
            focus_areas: vec!["  ".to_string()],
            region: Some(String::new()),
            funding_type: None,
        };
        assert!(!context.is_active());
        assert_eq!(base_score(&record), 88);
        assert_eq!(
            score_in_context(&record, &context, ConfidencePolicy::multiplicative()),
            88
        );
    }

    #[test]
    fn base_score_caps_focus_breadth() {
        let mut record = Organization::new("org-2", "Broad");
        record.focus_areas = (0..9).map(|index| format!("Area {index}")).collect();
        record.confidence = 100;
        assert_eq!(base_score(&record), 50 + 20 + 10);
    }

    #[test]
    fn active_context_rewards_matches_and_scales_by_confidence() {
        let record = rich_record();
        let context = AlignmentContext {
            focus_areas: vec!["Health".to_string()],
            region: Some("india".to_string()),
            funding_type: Some(FundingType::Grant),
        };
        // 50 + 20 + 15 + 10 + 5 = 100, scaled by 0.7 + 0.3 * 0.8 = 0.94
        assert_eq!(
            score_in_context(&record, &context, ConfidencePolicy::multiplicative()),
            94
        );
    }

    #[test]
    fn region_only_context_awards_breadth_instead_of_match() {
        let mut record = rich_record();
        record.confidence = 100;
        record.verification_status = VerificationStatus::Unverified;
        let context = AlignmentContext {
            region: Some("Kerala".to_string()),
            ..AlignmentContext::default()
        };
        // breadth min(15, 2 * 4) = 8, region miss
        assert_eq!(
            score_in_context(&record, &context, ConfidencePolicy::multiplicative()),
            58
        );
    }

    #[test]
    fn funding_only_context_awards_flat_region_presence() {
        let mut record = rich_record();
        record.confidence = 0;
        let context = AlignmentContext {
            funding_type: Some(FundingType::Mixed),
            ..AlignmentContext::default()
        };
        // 50 + 8 + 8 + 5 = 71, scaled by 0.7
        assert_eq!(
            score_in_context(&record, &context, ConfidencePolicy::multiplicative()),
            50
        );
    }
}
