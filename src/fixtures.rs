use crate::country;
use crate::models::FixtureRecord;
use crate::validation::{is_valid_iban, IbanCheck};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureFailure {
    pub line: usize,
    pub record: FixtureRecord,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub total: usize,
    pub passed: usize,
    pub failures: Vec<FixtureFailure>,
}

impl VerificationReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn load_fixtures<R: Read>(reader: R) -> Result<Vec<FixtureRecord>, String> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: FixtureRecord = result.map_err(|err| err.to_string())?;
        records.push(record);
    }
    Ok(records)
}

pub fn load_fixtures_from_path(path: &Path) -> Result<Vec<FixtureRecord>, String> {
    let file = std::fs::File::open(path)
        .map_err(|err| format!("cannot open fixture file {}: {}", path.display(), err))?;
    load_fixtures(file)
}

/// Runs every fixture through [`is_valid_iban`] and checks that its `code`
/// column matches the IBAN's country prefix.
pub fn verify_fixtures(records: &[FixtureRecord]) -> VerificationReport {
    let mut failures = Vec::new();

    for (idx, record) in records.iter().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        if let Some(reason) = fixture_problem(record) {
            log::debug!("fixture line {line} failed: {reason}");
            failures.push(FixtureFailure {
                line,
                record: record.clone(),
                reason,
            });
        }
    }

    VerificationReport {
        total: records.len(),
        passed: records.len() - failures.len(),
        failures,
    }
}

fn fixture_problem(record: &FixtureRecord) -> Option<String> {
    match is_valid_iban(&record.iban) {
        Ok(IbanCheck::Valid { formatted }) => {
            let expected = record.code.trim().to_ascii_uppercase();
            if !country::is_supported(&expected) {
                Some(format!("country code {} is not supported", record.code))
            } else if !formatted.starts_with(&expected) {
                Some(format!(
                    "country code {} does not match IBAN prefix",
                    record.code
                ))
            } else {
                None
            }
        }
        Ok(IbanCheck::ChecksumMismatch) => Some("checksum mismatch".to_string()),
        Err(err) => Some(err.to_string()),
    }
}
