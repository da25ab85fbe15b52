//! Academic background step.

use super::is_blank;
use crate::domain::{
    AcademicDraft, FieldKey, ValidationErrorSet, ValidationReport, ValidationWarning,
};

/// Validate the academic draft.
///
/// Overlapping formation dates are reported as warnings and never block.
pub fn validate_academic(draft: &AcademicDraft) -> ValidationReport {
    let mut errors = ValidationErrorSet::new();

    if is_blank(&draft.last_institution) {
        errors.insert("last_institution", "last institution is required");
    }

    if draft.formations.is_empty() {
        errors.insert("formations", "at least one formation is required");
    }

    for (index, formation) in draft.formations.as_slice().iter().enumerate() {
        let key = |field: &str| FieldKey::indexed("formations", index, field);
        if is_blank(&formation.institution) {
            errors.insert(key("institution"), "institution is required");
        }
        if is_blank(&formation.specialisation) {
            errors.insert(key("specialisation"), "specialisation is required");
        }
        if is_blank(&formation.level) {
            errors.insert(key("level"), "level is required");
        }
        if formation.start_date.is_none() {
            errors.insert(key("start_date"), "start date is required");
        }
        match formation.date_range() {
            None if formation.end_date.is_none() => {
                errors.insert(key("end_date"), "end date is required");
            }
            Some((start, end)) if start >= end => {
                errors.insert(key("end_date"), "end date must be after start date");
            }
            _ => {}
        }
    }

    let warnings = draft
        .formations
        .overlapping_pairs()
        .into_iter()
        .map(|(first, second)| ValidationWarning::FormationOverlap { first, second })
        .collect();

    ValidationReport { errors, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FormationList, FormationRecord};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn formation(start: (i32, u32, u32), end: (i32, u32, u32)) -> FormationRecord {
        FormationRecord {
            institution: "Lycée Victor Hugo".into(),
            specialisation: "Sciences".into(),
            level: "Terminale".into(),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2),
            degree_obtained: true,
            ..FormationRecord::blank()
        }
    }

    fn draft(formations: Vec<FormationRecord>) -> AcademicDraft {
        AcademicDraft {
            last_institution: "Lycée Victor Hugo".into(),
            formations: FormationList::new(formations),
        }
    }

    #[rstest]
    fn empty_formation_list_is_rejected() {
        let report = validate_academic(&draft(Vec::new()));
        assert_eq!(report.errors.get("formations"), Some("at least one formation is required"));
    }

    #[rstest]
    fn overlap_warns_without_blocking() {
        let report = validate_academic(&draft(vec![
            formation((2018, 9, 1), (2020, 6, 30)),
            formation((2019, 9, 1), (2021, 6, 30)),
        ]));
        assert!(report.passed());
        assert_eq!(report.warnings.len(), 1);
    }

    #[rstest]
    #[case((2020, 9, 1), (2020, 9, 1))]
    #[case((2021, 9, 1), (2020, 6, 30))]
    fn end_must_follow_start(#[case] start: (i32, u32, u32), #[case] end: (i32, u32, u32)) {
        let report = validate_academic(&draft(vec![formation(start, end)]));
        assert_eq!(
            report.errors.get("formations[0].end_date"),
            Some("end date must be after start date")
        );
    }

    #[rstest]
    fn blank_formation_reports_each_field_with_index() {
        let mut list = vec![formation((2018, 9, 1), (2019, 6, 30))];
        list.push(FormationRecord::blank());
        let report = validate_academic(&draft(list));
        let keys: Vec<_> = report.errors.keys().collect();
        assert_eq!(
            keys,
            vec![
                "formations[1].end_date",
                "formations[1].institution",
                "formations[1].level",
                "formations[1].specialisation",
                "formations[1].start_date",
            ]
        );
    }
}
