use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::checksum::split_parts;
use crate::country::FieldSpan;
use crate::error::{IbanError, Result};
use crate::util::remove_spaces;
use crate::validation::{validate, Validated, Validation};

/// A validated IBAN split into its parts.
///
/// Serializes as the compact number; deserializing validates again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iban {
    raw: String,
    canonical: String,
    formatted: String,
    country_code: String,
    checksum: String,
    bban: String,
    bank_code: String,
    branch_code: String,
    account_number: String,
}

impl Iban {
    /// Input exactly as it was supplied.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Uppercase number without whitespace.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Canonical number in space separated groups of four.
    pub fn formatted(&self) -> &str {
        &self.formatted
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// The two check digits.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// Basic bank account number: everything after the check digits.
    pub fn bban(&self) -> &str {
        &self.bban
    }

    /// Empty when the country layout defines no bank code.
    pub fn bank_code(&self) -> &str {
        &self.bank_code
    }

    /// Branch or sort code; empty when the country layout defines none.
    pub fn branch_code(&self) -> &str {
        &self.branch_code
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    fn from_validated(raw: &str, validated: Validated) -> Result<Self> {
        let Validated {
            canonical,
            formatted,
            layout,
        } = validated;
        let (country_code, checksum, bban) =
            split_parts(&canonical).ok_or(IbanError::InvalidIban)?;

        Ok(Iban {
            raw: raw.to_string(),
            country_code: country_code.to_string(),
            checksum: checksum.to_string(),
            bban: bban.to_string(),
            bank_code: slice_field(&formatted, layout.bank_code_span()),
            branch_code: slice_field(&formatted, layout.branch_code_span()),
            account_number: slice_field(&formatted, layout.account_number_span()),
            canonical,
            formatted,
        })
    }
}

fn slice_field(formatted: &str, span: Option<FieldSpan>) -> String {
    span.and_then(|span| formatted.get(span.range()))
        .map(remove_spaces)
        .unwrap_or_default()
}

/// Validates `input` and decomposes it into an [`Iban`].
///
/// Every failure, structural or checksum, is reported as
/// [`IbanError::InvalidIban`]. Use [`crate::is_valid_iban`] to tell them apart.
pub fn parse_iban(input: &str) -> Result<Iban> {
    match validate(input) {
        Ok(Validation::Valid(validated)) => Iban::from_validated(input, validated),
        Ok(Validation::ChecksumMismatch) => {
            log::debug!("rejected IBAN {input:?}: checksum mismatch");
            Err(IbanError::InvalidIban)
        }
        Err(err) => {
            log::debug!("rejected IBAN {input:?}: {err}");
            Err(IbanError::InvalidIban)
        }
    }
}

impl FromStr for Iban {
    type Err = IbanError;

    fn from_str(s: &str) -> Result<Self> {
        parse_iban(s)
    }
}

impl TryFrom<String> for Iban {
    type Error = IbanError;

    fn try_from(value: String) -> Result<Self> {
        parse_iban(&value)
    }
}

impl From<Iban> for String {
    fn from(iban: Iban) -> Self {
        iban.canonical
    }
}

impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luxembourg_has_bank_code_but_no_sort_code() {
        let iban = parse_iban("LU28 0019 4006 4475 0000").unwrap();
        assert_eq!(iban.raw(), "LU28 0019 4006 4475 0000");
        assert_eq!(iban.canonical(), "LU280019400644750000");
        assert_eq!(iban.formatted(), "LU28 0019 4006 4475 0000");
        assert_eq!(iban.country_code(), "LU");
        assert_eq!(iban.checksum(), "28");
        assert_eq!(iban.bban(), "0019400644750000");
        assert_eq!(iban.bank_code(), "001");
        assert_eq!(iban.branch_code(), "");
        assert_eq!(iban.account_number(), "9400644750000");
    }

    #[test]
    fn spain_bank_code() {
        for input in [
            "ES9121000418450200051332",
            "ES9121000418450200051332       ",
        ] {
            let iban = parse_iban(input).unwrap();
            assert_eq!(iban.bank_code(), "2100");
            assert_eq!(iban.branch_code(), "");
            assert_eq!(iban.account_number(), "0200051332");
            assert_eq!(iban.canonical(), "ES9121000418450200051332");
            assert_eq!(iban.raw(), input);
        }
        assert_eq!(parse_iban("ES3502297205860300042630").unwrap().bank_code(), "0229");
    }

    #[test]
    fn united_kingdom_sort_code() {
        let iban = parse_iban("gb82 west 1234 5698 7654 32").unwrap();
        assert_eq!(iban.bank_code(), "WEST");
        assert_eq!(iban.branch_code(), "123456");
        assert_eq!(iban.account_number(), "98765432");
    }

    #[test]
    fn france_account_spans_groups() {
        let iban = parse_iban("FR1420041010050500013M02606").unwrap();
        assert_eq!(iban.formatted(), "FR14 2004 1010 0505 0001 3M02 606");
        assert_eq!(iban.bank_code(), "20041");
        assert_eq!(iban.branch_code(), "");
        assert_eq!(iban.account_number(), "0500013M026");
    }

    #[test]
    fn every_failure_collapses_to_invalid_iban() {
        for input in [
            "LU12 3456 7890 1234 5678",
            "LU280019",
            "ZZ12345678901234567890",
            "LU28 0019 4006 4475 00001",
            "\u{FB01}21 1234 5600 0007 85",
            "",
        ] {
            let err = parse_iban(input).unwrap_err();
            assert_eq!(err, IbanError::InvalidIban, "{input}");
            assert_eq!(err.to_string(), "Invalid IBAN number received");
        }
    }

    #[test]
    fn text_round_trip_uses_compact_number() {
        let iban: Iban = "DE89 3704 0044 0532 0130 00".parse().unwrap();
        assert_eq!(iban.to_string(), "DE89370400440532013000");
        assert_eq!(String::from(iban.clone()), "DE89370400440532013000");

        let again = Iban::try_from(iban.to_string()).unwrap();
        assert_eq!(again.canonical(), iban.canonical());
        assert_eq!(again.bank_code(), "37040044");
        assert!(Iban::try_from("DE00370400440532013000".to_string()).is_err());
    }
}
