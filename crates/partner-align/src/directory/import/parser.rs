use super::normalizer::normalize_header;
use csv::StringRecord;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One CSV row with its source line, before enum parsing and validation.
#[derive(Debug)]
pub(crate) struct DirectoryRecord {
    pub(crate) line: u64,
    pub(crate) row: DirectoryRow,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<DirectoryRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: StringRecord = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();
    csv_reader.set_headers(headers.clone());

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|position| position.line()).unwrap_or(0);
        let row: DirectoryRow = record.deserialize(Some(&headers))?;
        if row.is_blank() {
            continue;
        }
        records.push(DirectoryRecord { line, row });
    }

    Ok(records)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DirectoryRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) name: Option<String>,
    #[serde(
        rename = "type",
        alias = "organization_type",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) organization_type: Option<String>,
    #[serde(
        alias = "focusareas",
        alias = "focus_area",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) focus_areas: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) region: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) mission: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) description: Option<String>,
    #[serde(
        alias = "fundingtype",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) funding_type: Option<String>,
    #[serde(
        alias = "verificationstatus",
        alias = "verified",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) verification_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) confidence: Option<String>,
}

impl DirectoryRow {
    fn is_blank(&self) -> bool {
        self.id.is_none()
            && self.name.is_none()
            && self.organization_type.is_none()
            && self.focus_areas.is_none()
            && self.region.is_none()
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
