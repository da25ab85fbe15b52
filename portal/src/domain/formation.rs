//! Prior-education entries captured by the academic step.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Locally generated identifier of a [`FormationRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormationId(Uuid);

impl FormationId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for FormationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One prior-education entry.
///
/// ## Invariants
/// - When both dates are present, `start_date < end_date`. The academic
///   validator reports violations; the record itself stays editable while the
///   case is a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormationRecord {
    /// Stable local identity used for edit and removal.
    #[serde(default = "FormationId::random")]
    pub id: FormationId,
    /// Institution attended.
    #[serde(default)]
    pub institution: String,
    /// Field of study.
    #[serde(default)]
    pub specialisation: String,
    /// Level reached (for example `Licence (L3)`).
    #[serde(default)]
    pub level: String,
    /// First day of the formation.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day of the formation.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Whether the degree was obtained.
    #[serde(default)]
    pub degree_obtained: bool,
}

impl FormationRecord {
    /// Blank entry with a fresh identity.
    pub fn blank() -> Self {
        Self {
            id: FormationId::random(),
            institution: String::new(),
            specialisation: String::new(),
            level: String::new(),
            start_date: None,
            end_date: None,
            degree_obtained: false,
        }
    }

    /// Complete date range, if both bounds are present.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.start_date?, self.end_date?))
    }

    /// Whether both ranges are complete and intersect, bounds included.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use portal::domain::FormationRecord;
    ///
    /// let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
    /// let mut first = FormationRecord::blank();
    /// first.start_date = day(2018, 9, 1);
    /// first.end_date = day(2020, 6, 30);
    /// let mut second = FormationRecord::blank();
    /// second.start_date = day(2020, 6, 30);
    /// second.end_date = day(2021, 6, 30);
    /// assert!(first.overlaps(&second));
    /// ```
    pub fn overlaps(&self, other: &Self) -> bool {
        match (self.date_range(), other.date_range()) {
            (Some((start, end)), Some((other_start, other_end))) => {
                start <= other_end && end >= other_start
            }
            _ => false,
        }
    }
}

/// Editable list of formations keyed by [`FormationId`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormationList(Vec<FormationRecord>);

impl FormationList {
    /// Wrap existing records.
    pub fn new(records: Vec<FormationRecord>) -> Self {
        Self(records)
    }

    /// Append a blank entry and return its identity.
    pub fn add_blank(&mut self) -> FormationId {
        let record = FormationRecord::blank();
        let id = record.id;
        self.0.push(record);
        id
    }

    /// Mutable access to the entry with `id`.
    pub fn get_mut(&mut self, id: FormationId) -> Option<&mut FormationRecord> {
        self.0.iter_mut().find(|record| record.id == id)
    }

    /// Remove the entry with `id`, returning it.
    pub fn remove(&mut self, id: FormationId) -> Option<FormationRecord> {
        let position = self.0.iter().position(|record| record.id == id)?;
        Some(self.0.remove(position))
    }

    /// Entries in insertion order.
    pub fn as_slice(&self) -> &[FormationRecord] {
        self.0.as_slice()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pairs of entries whose complete date ranges intersect, in list order.
    pub fn overlapping_pairs(&self) -> Vec<(FormationId, FormationId)> {
        let mut pairs = Vec::new();
        for (index, first) in self.0.iter().enumerate() {
            for second in self.0.iter().skip(index + 1) {
                if first.overlaps(second) {
                    pairs.push((first.id, second.id));
                }
            }
        }
        pairs
    }
}

impl From<Vec<FormationRecord>> for FormationList {
    fn from(value: Vec<FormationRecord>) -> Self {
        Self(value)
    }
}
