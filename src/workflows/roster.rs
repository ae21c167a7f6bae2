//! Seed contractor records from a roster CSV export.
//!
//! Expected headers: `Contractor ID`, `Full Name`, `Email`, and optionally `Status`, `Route`,
//! `Updated At`. Blank status means `draft`; blank route means no route selected yet.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use crate::workflows::onboarding::{
    ContractorId, ContractorProfile, ContractorRecord, ContractorStatus, OnboardingRoute,
};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, message: String },
    DuplicateContractor(ContractorId),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::InvalidRow { line, message } => {
                write!(f, "roster line {}: {}", line, message)
            }
            RosterImportError::DuplicateContractor(id) => {
                write!(f, "contractor '{}' appears more than once in roster", id)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ContractorRecord>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ContractorRecord>, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        let imported_at = Utc::now();

        for (index, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
            // Header occupies line 1.
            let line = index + 2;
            let record = row?.into_record(line, imported_at)?;

            if !seen.insert(record.id.clone()) {
                return Err(RosterImportError::DuplicateContractor(record.id));
            }
            records.push(record);
        }

        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Contractor ID")]
    contractor_id: String,
    #[serde(rename = "Full Name")]
    full_name: String,
    #[serde(rename = "Email", default)]
    email: String,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(rename = "Route", default, deserialize_with = "empty_string_as_none")]
    route: Option<String>,
    #[serde(
        rename = "Updated At",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    updated_at: Option<String>,
}

impl RosterRow {
    fn into_record(
        self,
        line: usize,
        imported_at: DateTime<Utc>,
    ) -> Result<ContractorRecord, RosterImportError> {
        let invalid = |message: String| RosterImportError::InvalidRow { line, message };

        if self.contractor_id.is_empty() {
            return Err(invalid("missing contractor id".to_string()));
        }

        let status = match self.status.as_deref() {
            Some(value) => value
                .parse::<ContractorStatus>()
                .map_err(|err| invalid(err.to_string()))?,
            None => ContractorStatus::Draft,
        };

        let route = self
            .route
            .as_deref()
            .map(str::parse::<OnboardingRoute>)
            .transpose()
            .map_err(|err| invalid(err.to_string()))?;

        let updated_at = self
            .updated_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(imported_at);

        let mut record = ContractorRecord::draft(
            ContractorId(self.contractor_id),
            ContractorProfile {
                full_name: self.full_name,
                email: self.email,
            },
            updated_at,
        );
        record.status = status;
        record.route = route;

        Ok(record)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
