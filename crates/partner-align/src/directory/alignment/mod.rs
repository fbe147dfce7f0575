//! Alignment scoring between organizations, or between an organization and a
//! search/preference context.
//!
//! Both modes are pure functions of their inputs. Scores are integers in `0..=100`.

mod config;
mod context;
mod pairwise;

pub use config::{AlignmentConfig, ConfidencePolicy};
pub use context::AlignmentContext;

use serde::{Deserialize, Serialize};

use super::domain::Organization;

/// Stateless scorer holding the configured confidence policies.
#[derive(Debug, Clone, Default)]
pub struct AlignmentEngine {
    config: AlignmentConfig,
}

impl AlignmentEngine {
    pub fn new(config: AlignmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Compatibility of two organizations as potential partners.
    pub fn pairwise(&self, a: &Organization, b: &Organization) -> AlignmentResult {
        pairwise::score_pair(a, b, self.config.pairwise_confidence)
    }

    /// Score of one organization against a query or preference context.
    pub fn contextual(&self, organization: &Organization, context: &AlignmentContext) -> u8 {
        context::score_in_context(organization, context, self.config.contextual_confidence)
    }

    /// Query-independent score used wherever no filter is active.
    pub fn base(&self, organization: &Organization) -> u8 {
        context::base_score(organization)
    }
}

/// Factors that can contribute to a pairwise score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentFactor {
    Base,
    FocusOverlap,
    Region,
    TypeCompatibility,
    Verification,
    Confidence,
}

/// Discrete contribution to a pairwise score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: AlignmentFactor,
    pub points: i32,
}

/// Pairwise score with a short explanation of the contributing factors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub score: u8,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ScoreComponent>,
}

pub(crate) fn clamp_score(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}
