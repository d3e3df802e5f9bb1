//! IBAN validation and decomposition.
//!
//! [`parse_iban`] checks a raw string against the ISO 13616 layout of its
//! country and the mod-97 checksum, then slices out bank code, branch (sort)
//! code and account number. [`is_valid_iban`] is the lower-level check and
//! [`compute_checksum`] derives the check digits for a number.

pub mod checksum;
pub mod country;
pub mod error;
pub mod fixtures;
pub mod generator;
pub mod iban;
pub mod models;
pub mod util;
pub mod validation;

pub use checksum::compute_checksum;
pub use country::CountryLayout;
pub use error::IbanError;
pub use iban::{parse_iban, Iban};
pub use validation::{is_valid_iban, IbanCheck};
