//! Case reference issued by a successful submission.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of the random suffix.
pub const SUFFIX_LEN: usize = 6;

static CASE_REFERENCE_RE: OnceLock<Regex> = OnceLock::new();

fn case_reference_regex() -> &'static Regex {
    CASE_REFERENCE_RE.get_or_init(|| {
        Regex::new(r"^INS-[0-9]{4}-[A-Z0-9]{6}$")
            .unwrap_or_else(|error| panic!("case reference regex failed to compile: {error}"))
    })
}

/// Error returned when a case reference is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed case reference: {0}")]
pub struct CaseReferenceError(String);

/// Reference shaped `INS-<year>-<6 uppercase alphanumerics>`.
///
/// # Examples
/// ```
/// use portal::domain::CaseReference;
///
/// let reference = CaseReference::new(2025, "AB12CD").unwrap();
/// assert_eq!(reference.as_str(), "INS-2025-AB12CD");
/// assert!(CaseReference::parse("INS-2025-ab12cd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CaseReference(String);

impl CaseReference {
    /// Assemble a reference from its year and suffix.
    pub fn new(year: i32, suffix: &str) -> Result<Self, CaseReferenceError> {
        Self::parse(&format!("INS-{year:04}-{suffix}"))
    }

    /// Validate an existing reference string.
    pub fn parse(value: &str) -> Result<Self, CaseReferenceError> {
        if case_reference_regex().is_match(value) {
            Ok(Self(value.to_owned()))
        } else {
            Err(CaseReferenceError(value.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CaseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CaseReference {
    type Error = CaseReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CaseReference> for String {
    fn from(value: CaseReference) -> Self {
        value.0
    }
}
