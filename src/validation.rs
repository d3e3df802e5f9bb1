use crate::checksum::is_checksum_valid;
use crate::country::{self, CountryLayout};
use crate::error::{IbanError, Result};
use crate::util::{group_by_four, normalize};

/// Raw inputs shorter than this are rejected before normalization.
pub const MIN_IBAN_INPUT_LEN: usize = 15;

/// Outcome of a structurally sound IBAN check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IbanCheck {
    Valid { formatted: String },
    ChecksumMismatch,
}

impl IbanCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, IbanCheck::Valid { .. })
    }

    /// Formatted IBAN, or an empty string when the checksum failed.
    pub fn formatted(&self) -> &str {
        match self {
            IbanCheck::Valid { formatted } => formatted,
            IbanCheck::ChecksumMismatch => "",
        }
    }
}

pub(crate) struct Validated {
    pub canonical: String,
    pub formatted: String,
    pub layout: &'static CountryLayout,
}

pub(crate) enum Validation {
    Valid(Validated),
    ChecksumMismatch,
}

pub(crate) fn validate(input: &str) -> Result<Validation> {
    if input.len() < MIN_IBAN_INPUT_LEN {
        return Err(IbanError::TooShort {
            input: input.to_string(),
        });
    }

    let canonical = normalize(input);
    let code = canonical.get(0..2).unwrap_or_default();
    let layout = country::lookup(code).ok_or_else(|| IbanError::UnknownCountry {
        code: canonical.chars().take(2).collect(),
    })?;

    if canonical.len() != layout.length() {
        return Err(IbanError::LengthMismatch {
            actual: canonical.len(),
            expected: layout.length(),
        });
    }

    if !is_checksum_valid(&canonical) {
        log::debug!("checksum mismatch for {canonical}");
        return Ok(Validation::ChecksumMismatch);
    }

    let formatted = group_by_four(&canonical);
    Ok(Validation::Valid(Validated {
        canonical,
        formatted,
        layout,
    }))
}

/// Checks `input` against the layout of its country and the mod-97 rule.
///
/// Structural problems (too short, unknown country, wrong length) are
/// returned as errors. A checksum failure is not an error: it yields
/// [`IbanCheck::ChecksumMismatch`].
pub fn is_valid_iban(input: &str) -> Result<IbanCheck> {
    Ok(match validate(input)? {
        Validation::Valid(validated) => IbanCheck::Valid {
            formatted: validated.formatted,
        },
        Validation::ChecksumMismatch => IbanCheck::ChecksumMismatch,
    })
}
