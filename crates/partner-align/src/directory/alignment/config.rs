use serde::{Deserialize, Serialize};

/// How record confidence adjusts a score once the bonuses are summed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ConfidencePolicy {
    /// Subtract `penalty` when confidence is below `threshold`, never going below zero.
    FlatPenalty { threshold: u8, penalty: u8 },
    /// Scale by `floor + (1 - floor) * confidence / 100`, rounded.
    Multiplicative { floor: f64 },
}

impl ConfidencePolicy {
    pub const fn flat_penalty() -> Self {
        ConfidencePolicy::FlatPenalty {
            threshold: 70,
            penalty: 5,
        }
    }

    pub const fn multiplicative() -> Self {
        ConfidencePolicy::Multiplicative { floor: 0.7 }
    }

    pub(crate) fn apply(self, score: i32, confidence: u8) -> i32 {
        let confidence = confidence.min(100);
        match self {
            ConfidencePolicy::FlatPenalty { threshold, penalty } => {
                if confidence < threshold {
                    (score - i32::from(penalty)).max(0)
                } else {
                    score
                }
            }
            ConfidencePolicy::Multiplicative { floor } => {
                let floor = floor.clamp(0.0, 1.0);
                let factor = floor + (1.0 - floor) * f64::from(confidence) / 100.0;
                (f64::from(score) * factor).round() as i32
            }
        }
    }
}

/// Scoring configuration shared by the pairwise and contextual modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    pub pairwise_confidence: ConfidencePolicy,
    pub contextual_confidence: ConfidencePolicy,
}

impl AlignmentConfig {
    /// Applies one confidence policy to both modes.
    pub const fn uniform(policy: ConfidencePolicy) -> Self {
        Self {
            pairwise_confidence: policy,
            contextual_confidence: policy,
        }
    }
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            pairwise_confidence: ConfidencePolicy::flat_penalty(),
            contextual_confidence: ConfidencePolicy::multiplicative(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_penalty_applies_below_threshold_only() {
        let policy = ConfidencePolicy::flat_penalty();
        assert_eq!(policy.apply(40, 69), 35);
        assert_eq!(policy.apply(40, 70), 40);
        assert_eq!(policy.apply(3, 10), 0);
    }

    #[test]
    fn multiplicative_never_drops_below_floor() {
        let policy = ConfidencePolicy::multiplicative();
        assert_eq!(policy.apply(100, 0), 70);
        assert_eq!(policy.apply(100, 100), 100);
        assert_eq!(policy.apply(80, 50), 68);
    }

    #[test]
    fn default_keeps_mode_specific_policies() {
        let config = AlignmentConfig::default();
        assert_eq!(config.pairwise_confidence, ConfidencePolicy::flat_penalty());
        assert_eq!(config.contextual_confidence, ConfidencePolicy::multiplicative());
        let uniform = AlignmentConfig::uniform(ConfidencePolicy::multiplicative());
        assert_eq!(uniform.pairwise_confidence, uniform.contextual_confidence);
    }
}
