//! Per-country IBAN layouts.
//!
//! Each layout carries a template with one character per position of the
//! formatted IBAN (four-character groups separated by single spaces). Field
//! positions are marked with [`BANK_CODE_MARKER`], [`BRANCH_CODE_MARKER`] and
//! [`ACCOUNT_NUMBER_MARKER`]; every other character is neutral. The spans are
//! derived at compile time from the first and last occurrence of each marker.

use std::ops::RangeInclusive;

pub const BANK_CODE_MARKER: u8 = b'b';
pub const BRANCH_CODE_MARKER: u8 = b's';
pub const ACCOUNT_NUMBER_MARKER: u8 = b'c';

/// Inclusive character span inside the formatted IBAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    pub first: usize,
    pub last: usize,
}

impl FieldSpan {
    pub fn range(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }

    pub fn overlaps(&self, other: &FieldSpan) -> bool {
        self.first <= other.last && other.first <= self.last
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharKind {
    Digit,
    Letter,
    Alphanumeric,
}

/// One `<count><kind>` entry of a BBAN format string such as `4a,10n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BbanPart {
    pub count: usize,
    pub kind: CharKind,
}

#[derive(Debug)]
pub struct CountryLayout {
    code: &'static str,
    name: &'static str,
    length: usize,
    bban_format: &'static str,
    template: &'static str,
    bank_code: Option<FieldSpan>,
    branch_code: Option<FieldSpan>,
    account_number: Option<FieldSpan>,
}

impl CountryLayout {
    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of characters in the compact (space free) IBAN.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of characters in the formatted IBAN, spaces included.
    pub fn formatted_len(&self) -> usize {
        self.template.len()
    }

    pub fn template(&self) -> &'static str {
        self.template
    }

    pub fn bban_format(&self) -> &'static str {
        self.bban_format
    }

    pub fn bank_code_span(&self) -> Option<FieldSpan> {
        self.bank_code
    }

    pub fn branch_code_span(&self) -> Option<FieldSpan> {
        self.branch_code
    }

    pub fn account_number_span(&self) -> Option<FieldSpan> {
        self.account_number
    }

    /// Parts of the BBAN format; malformed entries are skipped.
    pub fn bban_parts(&self) -> impl Iterator<Item = BbanPart> + '_ {
        self.bban_format.split(',').filter_map(|part| {
            let part = part.trim();
            let kind = match part.chars().last()? {
                'n' => CharKind::Digit,
                'a' => CharKind::Letter,
                'c' => CharKind::Alphanumeric,
                _ => return None,
            };
            let count = part[..part.len() - 1].parse::<usize>().ok()?;
            Some(BbanPart { count, kind })
        })
    }
}

const fn marker_span(template: &str, marker: u8) -> Option<FieldSpan> {
    let bytes = template.as_bytes();
    let mut first = usize::MAX;
    let mut last = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == marker {
            if first == usize::MAX {
                first = idx;
            }
            last = idx;
        }
        idx += 1;
    }
    if first == usize::MAX {
        None
    } else {
        Some(FieldSpan { first, last })
    }
}

const fn layout(
    code: &'static str,
    name: &'static str,
    length: usize,
    bban_format: &'static str,
    template: &'static str,
) -> CountryLayout {
    CountryLayout {
        code,
        name,
        length,
        bban_format,
        template,
        bank_code: marker_span(template, BANK_CODE_MARKER),
        branch_code: marker_span(template, BRANCH_CODE_MARKER),
        account_number: marker_span(template, ACCOUNT_NUMBER_MARKER),
    }
}

/// Looks up the layout for an uppercase two-letter country code.
pub fn lookup(code: &str) -> Option<&'static CountryLayout> {
    COUNTRY_LAYOUTS
        .binary_search_by(|layout| layout.code.cmp(&code))
        .ok()
        .map(|idx| &COUNTRY_LAYOUTS[idx])
}

pub fn all() -> &'static [CountryLayout] {
    COUNTRY_LAYOUTS
}

pub fn is_supported(code: &str) -> bool {
    lookup(code).is_some()
}

// Sorted by code for binary search. ES, FR and MC mark their branch office
// positions with `g`, so no sort code is surfaced for them.
static COUNTRY_LAYOUTS: &[CountryLayout] = &[
    layout("AD", "Andorra", 24, "8n,12c", "ADkk bbbb ssss cccc cccc cccc"),
    layout("AE", "United Arab Emirates", 23, "3n,16n", "AEkk bbbc cccc cccc cccc ccc"),
    layout("AL", "Albania", 28, "8n,16c", "ALkk bbbs sssx cccc cccc cccc cccc"),
    layout("AT", "Austria", 20, "16n", "ATkk bbbb bccc cccc cccc"),
    layout("AZ", "Azerbaijan", 28, "4a,20c", "AZkk bbbb cccc cccc cccc cccc cccc"),
    layout("BA", "Bosnia and Herzegovina", 20, "16n", "BAkk bbbs sscc cccc ccxx"),
    layout("BE", "Belgium", 16, "12n", "BEkk bbbc cccc ccxx"),
    layout("BG", "Bulgaria", 22, "4a,6n,8c", "BGkk bbbb ssss ttcc cccc cc"),
    layout("BH", "Bahrain", 22, "4a,14c", "BHkk bbbb cccc cccc cccc cc"),
    layout("BR", "Brazil", 29, "23n,1a,1c", "BRkk bbbb bbbb ssss sccc cccc ccct n"),
    layout("BY", "Belarus", 28, "4c,4n,16c", "BYkk bbbb xxxx cccc cccc cccc cccc"),
    layout("CH", "Switzerland", 21, "5n,12c", "CHkk bbbb bccc cccc cccc c"),
    layout("CR", "Costa Rica", 22, "18n", "CRkk xbbb cccc cccc cccc cc"),
    layout("CY", "Cyprus", 28, "8n,16c", "CYkk bbbs ssss cccc cccc cccc cccc"),
    layout("CZ", "Czech Republic", 24, "20n", "CZkk bbbb cccc cccc cccc cccc"),
    layout("DE", "Germany", 22, "18n", "DEkk bbbb bbbb cccc cccc cc"),
    layout("DK", "Denmark", 18, "14n", "DKkk bbbb cccc cccc cc"),
    layout("DO", "Dominican Republic", 28, "4c,20n", "DOkk bbbb cccc cccc cccc cccc cccc"),
    layout("EE", "Estonia", 20, "16n", "EEkk bbss cccc cccc cccx"),
    layout("EG", "Egypt", 29, "25n", "EGkk bbbb ssss cccc cccc cccc cccc c"),
    layout("ES", "Spain", 24, "20n", "ESkk bbbb gggg xxcc cccc cccc"),
    layout("FI", "Finland", 18, "14n", "FIkk bbbb bbcc cccc cx"),
    layout("FO", "Faroe Islands", 18, "14n", "FOkk bbbb cccc cccc cx"),
    layout("FR", "France", 27, "10n,11c,2n", "FRkk bbbb bggg ggcc cccc cccc cxx"),
    layout("GB", "United Kingdom", 22, "4a,14n", "GBkk bbbb ssss sscc cccc cc"),
    layout("GE", "Georgia", 22, "2a,16n", "GEkk bbcc cccc cccc cccc cc"),
    layout("GI", "Gibraltar", 23, "4a,15c", "GIkk bbbb cccc cccc cccc ccc"),
    layout("GL", "Greenland", 18, "14n", "GLkk bbbb cccc cccc cc"),
    layout("GR", "Greece", 27, "7n,16c", "GRkk bbbs sssc cccc cccc cccc ccc"),
    layout("GT", "Guatemala", 28, "4c,20c", "GTkk bbbb cccc cccc cccc cccc cccc"),
    layout("HR", "Croatia", 21, "17n", "HRkk bbbb bbbc cccc cccc c"),
    layout("HU", "Hungary", 28, "24n", "HUkk bbbs sssx cccc cccc cccc cccx"),
    layout("IE", "Ireland", 22, "4c,14n", "IEkk bbbb ssss sscc cccc cc"),
    layout("IL", "Israel", 23, "19n", "ILkk bbbs sscc cccc cccc ccc"),
    layout("IQ", "Iraq", 23, "4a,15n", "IQkk bbbb sssc cccc cccc ccc"),
    layout("IS", "Iceland", 26, "22n", "ISkk bbbb sscc cccc iiii iiii ii"),
    layout("IT", "Italy", 27, "1a,10n,12c", "ITkk xbbb bbss sssc cccc cccc ccc"),
    layout("JO", "Jordan", 30, "4a,4n,18c", "JOkk bbbb ssss cccc cccc cccc cccc cc"),
    layout("KW", "Kuwait", 30, "4a,22c", "KWkk bbbb cccc cccc cccc cccc cccc cc"),
    layout("KZ", "Kazakhstan", 20, "3n,13c", "KZkk bbbc cccc cccc cccc"),
    layout("LB", "Lebanon", 28, "4n,20c", "LBkk bbbb cccc cccc cccc cccc cccc"),
    layout("LC", "Saint Lucia", 32, "4a,24c", "LCkk bbbb cccc cccc cccc cccc cccc cccc"),
    layout("LI", "Liechtenstein", 21, "5n,12c", "LIkk bbbb bccc cccc cccc c"),
    layout("LT", "Lithuania", 20, "16n", "LTkk bbbb bccc cccc cccc"),
    layout("LU", "Luxembourg", 20, "3n,13c", "LUkk bbbc cccc cccc cccc"),
    layout("LV", "Latvia", 21, "4a,13c", "LVkk bbbb cccc cccc cccc c"),
    layout("LY", "Libya", 25, "21n", "LYkk bbbs sscc cccc cccc cccc c"),
    layout("MC", "Monaco", 27, "10n,11c,2n", "MCkk bbbb bggg ggcc cccc cccc cxx"),
    layout("MD", "Moldova", 24, "20c", "MDkk bbcc cccc cccc cccc cccc"),
    layout("ME", "Montenegro", 22, "18n", "MEkk bbbc cccc cccc cccc xx"),
    layout("MK", "North Macedonia", 19, "3n,10c,2n", "MKkk bbbc cccc cccc cxx"),
    layout("MR", "Mauritania", 27, "23n", "MRkk bbbb bsss sscc cccc cccc cxx"),
    layout("MT", "Malta", 31, "4a,5n,18c", "MTkk bbbb ssss sccc cccc cccc cccc ccc"),
    layout("MU", "Mauritius", 30, "4a,19n,3a", "MUkk bbbb bbss cccc cccc cccc xxxx xx"),
    layout("NL", "Netherlands", 18, "4a,10n", "NLkk bbbb cccc cccc cc"),
    layout("NO", "Norway", 15, "11n", "NOkk bbbb cccc ccx"),
    layout("PK", "Pakistan", 24, "4c,16c", "PKkk bbbb cccc cccc cccc cccc"),
    layout("PL", "Poland", 28, "24n", "PLkk bbbs sssx cccc cccc cccc cccc"),
    layout("PS", "Palestine", 29, "4a,21c", "PSkk bbbb cccc cccc cccc cccc cccc c"),
    layout("PT", "Portugal", 25, "21n", "PTkk bbbb ssss cccc cccc cccx x"),
    layout("QA", "Qatar", 29, "4a,21c", "QAkk bbbb cccc cccc cccc cccc cccc c"),
    layout("RO", "Romania", 24, "4a,16c", "ROkk bbbb cccc cccc cccc cccc"),
    layout("RS", "Serbia", 22, "18n", "RSkk bbbc cccc cccc cccc xx"),
    layout("SA", "Saudi Arabia", 24, "2n,18c", "SAkk bbcc cccc cccc cccc cccc"),
    layout("SC", "Seychelles", 31, "4a,20n,3a", "SCkk bbbb bbss cccc cccc cccc cccc xxx"),
    layout("SD", "Sudan", 18, "14n", "SDkk bbcc cccc cccc cc"),
    layout("SE", "Sweden", 24, "20n", "SEkk bbbc cccc cccc cccc cccc"),
    layout("SI", "Slovenia", 19, "15n", "SIkk bbss sccc cccc cxx"),
    layout("SK", "Slovakia", 24, "20n", "SKkk bbbb cccc cccc cccc cccc"),
    layout("SM", "San Marino", 27, "1a,10n,12c", "SMkk xbbb bbss sssc cccc cccc ccc"),
    layout("ST", "Sao Tome and Principe", 25, "21n", "STkk bbbb ssss cccc cccc cccx x"),
    layout("SV", "El Salvador", 28, "4a,20n", "SVkk bbbb cccc cccc cccc cccc cccc"),
    layout("TL", "Timor-Leste", 23, "19n", "TLkk bbbc cccc cccc cccc cxx"),
    layout("TN", "Tunisia", 24, "20n", "TNkk bbss sccc cccc cccc cccc"),
    layout("TR", "Turkey", 26, "6n,16c", "TRkk bbbb bxcc cccc cccc cccc cc"),
    layout("UA", "Ukraine", 29, "6n,19c", "UAkk bbbb bbcc cccc cccc cccc cccc c"),
    layout("VA", "Vatican City State", 22, "18n", "VAkk bbbc cccc cccc cccc cc"),
    layout("VG", "Virgin Islands, British", 24, "4a,16n", "VGkk bbbb cccc cccc cccc cccc"),
    layout("XK", "Kosovo", 20, "16n", "XKkk bbss cccc cccc ccxx"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::group_by_four;

    fn defined_spans(layout: &CountryLayout) -> Vec<FieldSpan> {
        [
            layout.bank_code_span(),
            layout.branch_code_span(),
            layout.account_number_span(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    #[test]
    fn table_is_sorted_and_unique() {
        for window in COUNTRY_LAYOUTS.windows(2) {
            assert!(
                window[0].code < window[1].code,
                "country layouts not sorted: {} >= {}",
                window[0].code,
                window[1].code
            );
        }
    }

    #[test]
    fn templates_match_formatted_length() {
        for layout in all() {
            let compact: String = layout.template.chars().filter(|ch| *ch != ' ').collect();
            assert_eq!(compact.len(), layout.length, "{}", layout.code);
            assert_eq!(group_by_four(&compact), layout.template, "{}", layout.code);
            assert!(layout.template.starts_with(layout.code), "{}", layout.code);
        }
    }

    #[test]
    fn field_spans_are_contiguous_and_disjoint() {
        for layout in all() {
            let bytes = layout.template.as_bytes();
            for (span, marker) in [
                (layout.bank_code_span(), BANK_CODE_MARKER),
                (layout.branch_code_span(), BRANCH_CODE_MARKER),
                (layout.account_number_span(), ACCOUNT_NUMBER_MARKER),
            ] {
                let Some(span) = span else {
                    continue;
                };
                assert!(span.last < layout.formatted_len(), "{}", layout.code);
                for idx in span.range() {
                    assert!(
                        bytes[idx] == marker || bytes[idx] == b' ',
                        "{} field {} is not contiguous",
                        layout.code,
                        marker as char
                    );
                }
            }

            let spans = defined_spans(layout);
            for (i, a) in spans.iter().enumerate() {
                for b in &spans[i + 1..] {
                    assert!(!a.overlaps(b), "{} spans overlap", layout.code);
                }
            }
        }
    }

    #[test]
    fn field_lengths_fit_within_country_length() {
        for layout in all() {
            let used: usize = defined_spans(layout)
                .iter()
                .map(|span| {
                    layout.template[span.range()]
                        .chars()
                        .filter(|ch| *ch != ' ')
                        .count()
                })
                .sum();
            assert!(used <= layout.length, "{}", layout.code);
        }
    }

    #[test]
    fn bban_format_covers_bban() {
        for layout in all() {
            let parts = layout.bban_format.split(',').count();
            assert_eq!(layout.bban_parts().count(), parts, "{}", layout.code);
            let total: usize = layout.bban_parts().map(|part| part.count).sum();
            assert_eq!(total, layout.length - 4, "{}", layout.code);
        }
    }

    #[test]
    fn luxembourg_has_no_branch_field() {
        let layout = lookup("LU").unwrap();
        assert_eq!(layout.length(), 20);
        assert_eq!(layout.bank_code_span(), Some(FieldSpan { first: 5, last: 7 }));
        assert_eq!(layout.branch_code_span(), None);
        assert_eq!(
            layout.account_number_span(),
            Some(FieldSpan { first: 8, last: 23 })
        );
    }

    #[test]
    fn united_kingdom_has_sort_code() {
        let layout = lookup("GB").unwrap();
        assert_eq!(layout.bank_code_span(), Some(FieldSpan { first: 5, last: 8 }));
        assert_eq!(
            layout.branch_code_span(),
            Some(FieldSpan { first: 10, last: 16 })
        );
    }

    #[test]
    fn unknown_codes_are_not_found() {
        assert!(lookup("ZZ").is_none());
        assert!(lookup("lu").is_none());
        assert!(lookup("").is_none());
        assert!(lookup("LUX").is_none());
        assert!(!is_supported("US"));
        assert!(is_supported("NO"));
    }
}
