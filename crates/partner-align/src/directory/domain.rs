use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for directory records.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(pub String);

impl OrganizationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrganizationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Closed set of organization kinds recognised by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrganizationType {
    #[serde(rename = "NGO")]
    Ngo,
    Foundation,
    Incubator,
    #[serde(rename = "CSR")]
    Csr,
    #[serde(rename = "Social Enterprise")]
    SocialEnterprise,
}

impl OrganizationType {
    pub const ALL: [OrganizationType; 5] = [
        OrganizationType::Ngo,
        OrganizationType::Foundation,
        OrganizationType::Incubator,
        OrganizationType::Csr,
        OrganizationType::SocialEnterprise,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            OrganizationType::Ngo => "NGO",
            OrganizationType::Foundation => "Foundation",
            OrganizationType::Incubator => "Incubator",
            OrganizationType::Csr => "CSR",
            OrganizationType::SocialEnterprise => "Social Enterprise",
        }
    }
}

impl FromStr for OrganizationType {
    type Err = UnknownValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token = normalize_token(raw);
        Self::ALL
            .into_iter()
            .find(|kind| normalize_token(kind.label()) == token)
            .ok_or_else(|| UnknownValue::new("organization type", raw))
    }
}

/// How an organization participates in funding relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundingType {
    Grant,
    Provider,
    Recipient,
    Mixed,
}

impl FundingType {
    pub const ALL: [FundingType; 4] = [
        FundingType::Grant,
        FundingType::Provider,
        FundingType::Recipient,
        FundingType::Mixed,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FundingType::Grant => "grant",
            FundingType::Provider => "provider",
            FundingType::Recipient => "recipient",
            FundingType::Mixed => "mixed",
        }
    }
}

impl FromStr for FundingType {
    type Err = UnknownValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token = normalize_token(raw);
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == token)
            .ok_or_else(|| UnknownValue::new("funding type", raw))
    }
}

/// Trust flag on a record. Records without a status are treated as unverified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    #[default]
    Unverified,
    Pending,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::Pending => "pending",
        }
    }
}

impl FromStr for VerificationStatus {
    type Err = UnknownValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize_token(raw).as_str() {
            "verified" => Ok(VerificationStatus::Verified),
            "unverified" => Ok(VerificationStatus::Unverified),
            "pending" => Ok(VerificationStatus::Pending),
            _ => Err(UnknownValue::new("verification status", raw)),
        }
    }
}

/// Raised when a textual enum value is outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind} '{value}'")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownValue {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Directory record as supplied by the organization store.
///
/// Deserialization is lenient: missing collections become empty, and missing or
/// unrecognised scalars take their least favourable value, so every stored record
/// can be scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: OrganizationId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_enum")]
    pub organization_type: Option<OrganizationType>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub focus_areas: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub region: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub mission: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub funding_type: Option<FundingType>,
    #[serde(default, deserialize_with = "lenient_verification")]
    pub verification_status: VerificationStatus,
    #[serde(default, deserialize_with = "lenient_confidence")]
    pub confidence: u8,
}

impl Organization {
    /// Minimal record carrying only an id and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: OrganizationId(id.into()),
            name: name.into(),
            organization_type: None,
            focus_areas: Vec::new(),
            region: String::new(),
            mission: String::new(),
            description: String::new(),
            funding_type: None,
            verification_status: VerificationStatus::Unverified,
            confidence: 0,
        }
    }

    /// Distinct, non-blank focus areas. Matching stays case-sensitive.
    pub fn focus_set(&self) -> BTreeSet<&str> {
        self.focus_areas
            .iter()
            .map(String::as_str)
            .filter(|area| !area.trim().is_empty())
            .collect()
    }

    pub fn has_region(&self) -> bool {
        !self.region.trim().is_empty()
    }

    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }

    /// Confidence bounded to `0..=100`.
    pub fn confidence(&self) -> u8 {
        self.confidence.min(100)
    }
}

/// Lowercases and collapses whitespace, treating `-` and `_` as spaces.
pub(crate) fn normalize_token(value: &str) -> String {
    let cleaned = value
        .replace(['\u{feff}', '\u{200b}'], "")
        .replace(['-', '_'], " ");
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

fn lenient_verification<'de, D>(deserializer: D) -> Result<VerificationStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_enum(deserializer)?.unwrap_or_default())
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_confidence<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(clamp_confidence).unwrap_or(0))
}

pub(crate) fn clamp_confidence(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
