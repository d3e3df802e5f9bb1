use serde::{Deserialize, Serialize};

/// One row of an IBAN fixture file: `country,code,iban`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureRecord {
    pub country: String,
    pub code: String,
    pub iban: String,
}
