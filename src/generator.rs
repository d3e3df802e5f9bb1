use crate::checksum::check_digits;
use crate::country::{self, CharKind, CountryLayout};
use crate::error::{IbanError, Result};
use crate::models::FixtureRecord;
use crate::util::{random_alphanum_upper, random_digits, random_upper_letters};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::Path;

pub struct GeneratorConfig {
    /// Country codes to cycle through; empty means every supported country.
    pub countries: Vec<String>,
    pub count: usize,
}

/// Builds a random BBAN following the layout's format and prefixes it with
/// the matching check digits.
pub fn generate_iban<R: Rng + ?Sized>(rng: &mut R, layout: &CountryLayout) -> Result<String> {
    let mut bban = String::with_capacity(layout.length());
    for part in layout.bban_parts() {
        let chunk = match part.kind {
            CharKind::Digit => random_digits(rng, part.count),
            CharKind::Letter => random_upper_letters(rng, part.count),
            CharKind::Alphanumeric => random_alphanum_upper(rng, part.count),
        };
        bban.push_str(&chunk);
    }
    let check = check_digits(layout.code(), &bban)?;
    Ok(format!("{}{:02}{}", layout.code(), check, bban))
}

pub fn generate_records(config: &GeneratorConfig, seed: u64) -> Result<Vec<FixtureRecord>> {
    let layouts = resolve_layouts(&config.countries)?;
    if layouts.is_empty() {
        return Ok(Vec::new());
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(config.count);
    for layout in layouts.iter().cycle().take(config.count) {
        let iban = generate_iban(&mut rng, layout)?;
        records.push(FixtureRecord {
            country: layout.name().to_string(),
            code: layout.code().to_string(),
            iban,
        });
    }

    log::debug!(
        "generated {} IBANs across {} countries (seed {})",
        records.len(),
        layouts.len(),
        seed
    );
    Ok(records)
}

pub fn write_records_csv(
    output: &Path,
    records: &[FixtureRecord],
) -> std::result::Result<(), String> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| err.to_string())?;
        }
    }
    let mut writer = csv::Writer::from_path(output).map_err(|err| err.to_string())?;
    for record in records {
        writer.serialize(record).map_err(|err| err.to_string())?;
    }
    writer.flush().map_err(|err| err.to_string())
}

fn resolve_layouts(codes: &[String]) -> Result<Vec<&'static CountryLayout>> {
    if codes.is_empty() {
        return Ok(country::all().iter().collect());
    }
    codes
        .iter()
        .map(|code| {
            let code = code.trim().to_ascii_uppercase();
            country::lookup(&code).ok_or(IbanError::UnknownCountry { code })
        })
        .collect()
}
