/// Failures raised while checking or decomposing an IBAN.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IbanError {
    /// Input is shorter than the minimum IBAN length.
    #[error("IBAN: incorrect IBAN string passed <{input}>")]
    TooShort { input: String },

    /// Leading two characters do not name a supported country.
    #[error("IBAN: country <{code}> is not in the list")]
    UnknownCountry { code: String },

    /// Normalized length differs from the country's configured length.
    #[error("IBAN: length ({actual}) does not match configuration length ({expected})")]
    LengthMismatch { actual: usize, expected: usize },

    /// Text holds characters the mod-97 substitution cannot map.
    #[error("IBAN: unsupported characters in <{input}>")]
    InvalidCharacters { input: String },

    /// Generic rejection from [`crate::parse_iban`]; the cause is not exposed.
    #[error("Invalid IBAN number received")]
    InvalidIban,
}

pub type Result<T> = std::result::Result<T, IbanError>;
