use super::super::domain::{Organization, OrganizationType};
use super::config::ConfidencePolicy;
use super::{clamp_score, AlignmentFactor, AlignmentResult, ScoreComponent};

const BASE_SCORE: i32 = 40;
const REGION_BONUS: i32 = 15;
const TYPE_BONUS: i32 = 5;
const VERIFIED_BONUS: i32 = 5;
const VERIFIED_CAP: i32 = 10;
const FALLBACK_REASON: &str = "Complementary missions";

/// Unordered type pairs that tend to partner well.
const COMPATIBLE_TYPES: &[(OrganizationType, OrganizationType)] = &[
    (OrganizationType::Ngo, OrganizationType::Foundation),
    (OrganizationType::Ngo, OrganizationType::Csr),
    (OrganizationType::Ngo, OrganizationType::Incubator),
    (OrganizationType::SocialEnterprise, OrganizationType::Incubator),
    (OrganizationType::SocialEnterprise, OrganizationType::Foundation),
];

pub(crate) fn score_pair(
    a: &Organization,
    b: &Organization,
    confidence_policy: ConfidencePolicy,
) -> AlignmentResult {
    let mut components = vec![ScoreComponent {
        factor: AlignmentFactor::Base,
        points: BASE_SCORE,
    }];
    let mut total = BASE_SCORE;
    let mut reasons = Vec::new();

    let overlap = a.focus_set().intersection(&b.focus_set()).count();
    let focus_bonus = overlap_bonus(overlap);
    if overlap > 0 {
        components.push(ScoreComponent {
            factor: AlignmentFactor::FocusOverlap,
            points: focus_bonus,
        });
        total += focus_bonus;
        reasons.push(format!("{overlap} focus area match"));
    }

    // Blank regions never count as a match.
    if a.has_region() && a.region == b.region {
        components.push(ScoreComponent {
            factor: AlignmentFactor::Region,
            points: REGION_BONUS,
        });
        total += REGION_BONUS;
        reasons.push("Same region".to_string());
    }

    if types_compatible(a.organization_type, b.organization_type) {
        components.push(ScoreComponent {
            factor: AlignmentFactor::TypeCompatibility,
            points: TYPE_BONUS,
        });
        total += TYPE_BONUS;
    }

    let verified = [a, b].iter().filter(|org| org.is_verified()).count() as i32;
    if verified > 0 {
        let bonus = (verified * VERIFIED_BONUS).min(VERIFIED_CAP);
        components.push(ScoreComponent {
            factor: AlignmentFactor::Verification,
            points: bonus,
        });
        total += bonus;
        if verified == 2 {
            reasons.push("Both verified".to_string());
        }
    }

    let adjusted = confidence_policy.apply(total, a.confidence().min(b.confidence()));
    if adjusted != total {
        components.push(ScoreComponent {
            factor: AlignmentFactor::Confidence,
            points: adjusted - total,
        });
    }

    let reason = if reasons.is_empty() {
        FALLBACK_REASON.to_string()
    } else {
        reasons.join(", ")
    };

    AlignmentResult {
        score: clamp_score(adjusted),
        reason,
        components,
    }
}

/// Banded bonus: a single shared area is already informative, so extra overlap
/// is capped quickly.
pub(crate) fn overlap_bonus(overlap: usize) -> i32 {
    match overlap {
        0 => 0,
        1 => 10,
        2 | 3 => 20,
        _ => 30,
    }
}

pub(crate) fn types_compatible(a: Option<OrganizationType>, b: Option<OrganizationType>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => COMPATIBLE_TYPES
            .iter()
            .any(|&(left, right)| (left == a && right == b) || (left == b && right == a)),
        _ => false,
    }
}
