use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use super::alignment::AlignmentEngine;
use super::domain::Organization;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Request for partners of one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub org_id: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Candidate partner with its pairwise score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub organization: Organization,
    pub alignment_score: u8,
    pub match_reason: String,
}

/// One page of recommendations. `total` counts every candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationPage {
    pub org_id: String,
    pub results: Vec<Recommendation>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Scores every candidate against `target`, best first. The target itself is skipped.
pub fn rank_partners(
    target: &Organization,
    candidates: Vec<Organization>,
    engine: &AlignmentEngine,
) -> Vec<Recommendation> {
    let mut ranked: Vec<Recommendation> = candidates
        .into_iter()
        .filter(|candidate| candidate.id != target.id)
        .map(|candidate| {
            let result = engine.pairwise(target, &candidate);
            Recommendation {
                organization: candidate,
                alignment_score: result.score,
                match_reason: result.reason,
            }
        })
        .collect();

    ranked.sort_by_key(|entry| Reverse(entry.alignment_score));
    ranked
}

/// Slices a ranked list. `limit` is clamped to `1..=max_limit`.
pub fn paginate(
    org_id: String,
    ranked: Vec<Recommendation>,
    limit: Option<usize>,
    offset: Option<usize>,
    max_limit: usize,
) -> RecommendationPage {
    let limit = limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, max_limit.max(1));
    let offset = offset.unwrap_or(0);
    let total = ranked.len();
    let results = ranked.into_iter().skip(offset).take(limit).collect();

    RecommendationPage {
        org_id,
        results,
        total,
        limit,
        offset,
    }
}
