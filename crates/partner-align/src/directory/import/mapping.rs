use super::super::domain::{
    clamp_confidence, normalize_token, FundingType, OrganizationType, VerificationStatus,
};
use std::collections::HashMap;
use std::sync::OnceLock;

static TYPE_ALIASES: OnceLock<HashMap<String, OrganizationType>> = OnceLock::new();

pub(crate) fn organization_type_for(raw: &str) -> Option<OrganizationType> {
    raw.parse()
        .ok()
        .or_else(|| type_aliases().get(&normalize_token(raw)).copied())
}

fn type_aliases() -> &'static HashMap<String, OrganizationType> {
    TYPE_ALIASES.get_or_init(|| {
        const ALIASES: &[(&str, OrganizationType)] = &[
            ("Non-profit", OrganizationType::Ngo),
            ("Nonprofit", OrganizationType::Ngo),
            ("Non Governmental Organization", OrganizationType::Ngo),
            ("Non-Governmental Organisation", OrganizationType::Ngo),
            ("Trust", OrganizationType::Foundation),
            ("Grantmaker", OrganizationType::Foundation),
            ("Accelerator", OrganizationType::Incubator),
            ("Corporate", OrganizationType::Csr),
            ("Corporate Social Responsibility", OrganizationType::Csr),
            ("Corporate CSR", OrganizationType::Csr),
            ("SocialEnterprise", OrganizationType::SocialEnterprise),
            ("Social Business", OrganizationType::SocialEnterprise),
        ];

        ALIASES
            .iter()
            .map(|(alias, kind)| (normalize_token(alias), *kind))
            .collect()
    })
}

pub(crate) fn funding_type_for(raw: &str) -> Option<FundingType> {
    raw.parse().ok()
}

/// Unknown statuses fall back to unverified. `yes`/`true` columns count as verified.
pub(crate) fn verification_for(raw: Option<&str>) -> VerificationStatus {
    match raw.map(normalize_token).as_deref() {
        Some("yes") | Some("true") | Some("y") => VerificationStatus::Verified,
        Some(token) => token.parse().unwrap_or_default(),
        None => VerificationStatus::Unverified,
    }
}

pub(crate) fn confidence_for(raw: Option<&str>) -> u8 {
    raw.and_then(|value| value.trim().trim_end_matches('%').parse::<f64>().ok())
        .map(clamp_confidence)
        .unwrap_or(0)
}

#[cfg(test)]
pub(crate) fn lookup_type_for_tests(raw: &str) -> Option<OrganizationType> {
    organization_type_for(raw)
}
