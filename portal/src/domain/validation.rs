//! Field-level validation results shared by every wizard step.
//!
//! A [`ValidationReport`] is recomputed wholesale on each validation pass:
//! callers replace the previous report instead of appending to it.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Value, json};

use super::formation::FormationId;

/// Key identifying the field a validation message belongs to.
///
/// Keys are flat strings such as `family_name` or indexed paths such as
/// `formations[1].start_date`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldKey(String);

impl FieldKey {
    /// Key for a top-level field.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Key for a field of the `index`-th entry in a list.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::FieldKey;
    ///
    /// let key = FieldKey::indexed("formations", 2, "level");
    /// assert_eq!(key.as_str(), "formations[2].level");
    /// ```
    pub fn indexed(list: &str, index: usize, field: &str) -> Self {
        Self(format!("{list}[{index}].{field}"))
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FieldKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Mapping from field key to a human-readable message.
///
/// Any entry blocks step advancement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrorSet(BTreeMap<FieldKey, String>);

impl ValidationErrorSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `key`, replacing any earlier message for it.
    pub fn insert(&mut self, key: impl Into<FieldKey>, message: impl Into<String>) {
        self.0.insert(key.into(), message.into());
    }

    /// Message recorded for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&FieldKey::new(key)).map(String::as_str)
    }

    /// Whether a message is recorded for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, message)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &str)> {
        self.0.iter().map(|(key, message)| (key, message.as_str()))
    }

    /// Failing field keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(FieldKey::as_str)
    }
}

/// Non-blocking observation raised during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// Two formation entries have intersecting date ranges.
    FormationOverlap {
        /// Earlier entry in list order.
        first: FormationId,
        /// Later entry in list order.
        second: FormationId,
    },
}

impl ValidationWarning {
    /// Human-readable description of the warning.
    pub fn message(&self) -> String {
        match self {
            Self::FormationOverlap { first, second } => {
                format!("formations {first} and {second} have overlapping dates")
            }
        }
    }
}

/// Outcome of validating one step draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Blocking field errors.
    pub errors: ValidationErrorSet,
    /// Non-blocking warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Report with the given errors and no warnings.
    pub fn from_errors(errors: ValidationErrorSet) -> Self {
        Self {
            errors,
            warnings: Vec::new(),
        }
    }

    /// Whether the step may advance.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// Structured representation used in error details.
    pub fn to_details(&self) -> Value {
        json!({
            "fields": self.errors,
            "warnings": self.warnings,
        })
    }
}
