//! Pure per-step validators.
//!
//! Each validator inspects one draft and returns a fresh
//! [`ValidationReport`](crate::domain::ValidationReport). They never read the
//! clock themselves: callers pass `today` so age checks stay deterministic.

mod academic;
mod contact;
mod documents;
mod personal;

pub use academic::validate_academic;
pub use contact::validate_contact;
pub use documents::validate_documents;
pub use personal::{MINIMUM_AGE_YEARS, age_on, validate_personal};

use std::sync::OnceLock;

use regex::Regex;

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

static PHONE_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^(?:\+33|0)[1-9][0-9]{8}$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

/// Whether `value` is a French phone number once whitespace is removed.
///
/// # Examples
/// ```
/// use portal::domain::validators::is_french_phone;
///
/// assert!(is_french_phone("06 12 34 56 78"));
/// assert!(is_french_phone("+33612345678"));
/// assert!(!is_french_phone("0012345678"));
/// ```
pub fn is_french_phone(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    phone_regex().is_match(&compact)
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Whether `value` is shaped `local@domain.tld` without whitespace.
pub fn is_well_formed_email(value: &str) -> bool {
    email_regex().is_match(value)
}
