//! ISO 7064 MOD 97-10 check digit handling.
//!
//! The leading four characters are moved to the end, letters are replaced by
//! their two-digit codes (A=10 .. Z=35) and the resulting digit string is
//! reduced modulo 97 in chunks of at most nine digits, so no big integer type
//! is needed. A valid IBAN leaves a remainder of 1.

use crate::error::{IbanError, Result};
use crate::util::normalize;

/// Raw inputs must be longer than 15 characters to have a checksum computed.
pub const MIN_CHECKSUM_INPUT_LEN: usize = 16;

const CHUNK_DIGITS: usize = 9;

/// Splits a normalized IBAN into country code, check digits and BBAN.
pub fn split_parts(canonical: &str) -> Option<(&str, &str, &str)> {
    Some((
        canonical.get(0..2)?,
        canonical.get(2..4)?,
        canonical.get(4..)?,
    ))
}

pub fn rearrange(country_code: &str, checksum: &str, bban: &str) -> String {
    format!("{bban}{country_code}{checksum}")
}

/// Replaces every letter A-Z with its numeric code. Returns `None` when the
/// value holds anything other than ASCII digits and uppercase letters.
pub fn to_digits(value: &str) -> Option<String> {
    let mut out = String::with_capacity(value.len() * 2);
    for ch in value.chars() {
        match ch {
            '0'..='9' => out.push(ch),
            'A'..='Z' => {
                let code = ch as u32 - 'A' as u32 + 10;
                out.push_str(&code.to_string());
            }
            _ => return None,
        }
    }
    Some(out)
}

/// Remainder of an arbitrarily long decimal string modulo 97.
///
/// Each step reads up to nine digits, the previous remainder included as the
/// leading one or two of them.
pub fn mod97(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut remainder: u64 = 0;
    let mut carried = 0usize;
    let mut rest = digits;
    loop {
        let take = (CHUNK_DIGITS - carried).min(rest.len());
        let (chunk, tail) = rest.split_at(take);
        let value = chunk
            .bytes()
            .fold(remainder, |acc, b| acc * 10 + u64::from(b - b'0'));
        remainder = value % 97;
        rest = tail;
        if rest.is_empty() {
            return Some(remainder as u32);
        }
        carried = if remainder < 10 { 1 } else { 2 };
    }
}

/// Mod-97 remainder of a normalized IBAN after rearrangement, or `None`
/// when the text cannot be converted.
pub fn iban_remainder(canonical: &str) -> Option<u32> {
    let (country_code, checksum, bban) = split_parts(canonical)?;
    let digits = to_digits(&rearrange(country_code, checksum, bban))?;
    mod97(&digits)
}

pub fn is_checksum_valid(canonical: &str) -> bool {
    iban_remainder(canonical) == Some(1)
}

/// Check digits for `bban` under `country_code`, both normalized.
pub fn check_digits(country_code: &str, bban: &str) -> Result<u8> {
    let invalid = || IbanError::InvalidCharacters {
        input: format!("{country_code}{bban}"),
    };
    let digits = to_digits(&rearrange(country_code, "00", bban)).ok_or_else(invalid)?;
    let remainder = mod97(&digits).ok_or_else(invalid)?;
    Ok((98 - remainder) as u8)
}

/// Computes the check digits that belong in positions 3-4 of `input`.
///
/// The digits already present are ignored. Inputs of 15 characters or fewer
/// (counted before whitespace removal) are rejected.
pub fn compute_checksum(input: &str) -> Result<u8> {
    if input.len() < MIN_CHECKSUM_INPUT_LEN {
        return Err(IbanError::TooShort {
            input: input.to_string(),
        });
    }

    let canonical = normalize(input);
    if canonical.len() < 4 {
        return Err(IbanError::TooShort {
            input: input.to_string(),
        });
    }
    let (country_code, _, bban) =
        split_parts(&canonical).ok_or_else(|| IbanError::InvalidCharacters {
            input: canonical.clone(),
        })?;
    let checksum = check_digits(country_code, bban)?;
    log::trace!("computed checksum {checksum:02} for {canonical}");
    Ok(checksum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_map_to_two_digit_codes() {
        assert_eq!(to_digits("A").as_deref(), Some("10"));
        assert_eq!(to_digits("Z9").as_deref(), Some("359"));
        assert_eq!(to_digits("0019LU28").as_deref(), Some("0019213028"));
        assert_eq!(to_digits("ab"), None);
        assert_eq!(to_digits("1-2"), None);
    }

    #[test]
    fn chunked_reduction_matches_native_modulo() {
        let samples = [
            "1",
            "96",
            "97",
            "123456789",
            "1234567890",
            "99999999999999999999",
            "00000000000000000001",
            "214500000000000000000000000001234567",
            "98765432109876543210987654321098765432",
        ];
        for digits in samples {
            let native = digits.parse::<u128>().unwrap() % 97;
            assert_eq!(mod97(digits), Some(native as u32), "{digits}");
        }
    }

    #[test]
    fn mod97_rejects_non_digits() {
        assert_eq!(mod97(""), None);
        assert_eq!(mod97("12a4"), None);
        assert_eq!(mod97("+123"), None);
    }

    #[test]
    fn known_ibans_leave_remainder_one() {
        for iban in [
            "LU280019400644750000",
            "ES9121000418450200051332",
            "GB82WEST12345698765432",
            "DE89370400440532013000",
        ] {
            assert!(is_checksum_valid(iban), "{iban}");
        }
        assert!(!is_checksum_valid("LU123456789012345678"));
        assert!(!is_checksum_valid("LU"));
    }

    #[test]
    fn compute_checksum_recovers_check_digits() {
        assert_eq!(compute_checksum("LU000019400644750000"), Ok(28));
        assert_eq!(compute_checksum("ES0021000418450200051332"), Ok(91));
        assert_eq!(compute_checksum("DE89370400440532013000"), Ok(89));
        assert_eq!(compute_checksum("gb00 west 1234 5698 7654 32"), Ok(82));
    }

    #[test]
    fn compute_checksum_requires_more_than_fifteen_characters() {
        assert_eq!(
            compute_checksum("NO9386011117947"),
            Err(IbanError::TooShort {
                input: "NO9386011117947".to_string()
            })
        );
        assert_eq!(compute_checksum("NO93860111179470"), Ok(37));
    }

    #[test]
    fn compute_checksum_rejects_unconvertible_input() {
        assert!(matches!(
            compute_checksum("LU00-019400644750000"),
            Err(IbanError::InvalidCharacters { .. })
        ));
        assert!(matches!(
            compute_checksum("                 "),
            Err(IbanError::TooShort { .. })
        ));
        assert!(compute_checksum("ÄÖÜ0019400644750000").is_err());
    }
}
