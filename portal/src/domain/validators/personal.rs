//! Personal information step.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use super::is_blank;
use crate::domain::{PersonalInfoDraft, ValidationErrorSet, ValidationReport};

/// Youngest age accepted on the day of validation.
pub const MINIMUM_AGE_YEARS: i32 = 16;

static FAMILY_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn family_name_regex() -> &'static Regex {
    FAMILY_NAME_RE.get_or_init(|| {
        // ASCII and Latin-1 accented letters, whitespace and hyphens.
        Regex::new(r"^[a-zA-ZÀ-ÿ\s-]+$")
            .unwrap_or_else(|error| panic!("family name regex failed to compile: {error}"))
    })
}

/// Whole years elapsed between `birth_date` and `today`.
///
/// A birthday falling on `today` counts as reached.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use portal::domain::validators::age_on;
///
/// let birth = NaiveDate::from_ymd_opt(2008, 10, 16).unwrap();
/// let today = NaiveDate::from_ymd_opt(2024, 10, 16).unwrap();
/// assert_eq!(age_on(birth, today), 16);
/// assert_eq!(age_on(birth, today.pred_opt().unwrap()), 15);
/// ```
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years - 1
    } else {
        years
    }
}

/// Validate the personal information draft.
pub fn validate_personal(draft: &PersonalInfoDraft, today: NaiveDate) -> ValidationReport {
    let mut errors = ValidationErrorSet::new();

    if is_blank(&draft.family_name) {
        errors.insert("family_name", "family name is required");
    } else if !family_name_regex().is_match(draft.family_name.trim()) {
        errors.insert(
            "family_name",
            "family name may only contain letters, spaces and hyphens",
        );
    }

    if draft.given_names.iter().all(|name| is_blank(name)) {
        errors.insert("given_names", "at least one given name is required");
    }

    if draft.sex.is_none() {
        errors.insert("sex", "sex is required");
    }

    match draft.birth_date {
        None => errors.insert("birth_date", "birth date is required"),
        Some(birth_date) if age_on(birth_date, today) < MINIMUM_AGE_YEARS => errors.insert(
            "birth_date",
            format!("applicant must be at least {MINIMUM_AGE_YEARS} years old"),
        ),
        Some(_) => {}
    }

    if is_blank(&draft.nationality) {
        errors.insert("nationality", "nationality is required");
    }

    if draft.identity_document.is_none() {
        errors.insert("identity_document", "identity document type is required");
    }

    ValidationReport::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IdentityDocumentType, Sex};
    use rstest::{fixture, rstest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[fixture]
    fn today() -> NaiveDate {
        date(2024, 10, 16)
    }

    #[fixture]
    fn valid_draft() -> PersonalInfoDraft {
        PersonalInfoDraft {
            family_name: "Dupont".into(),
            given_names: vec!["Marie".into()],
            sex: Some(Sex::Female),
            birth_date: Some(date(2004, 3, 15)),
            nationality: "Française".into(),
            identity_document: Some(IdentityDocumentType::NationalIdCard),
        }
    }

    #[rstest]
    fn valid_draft_passes(valid_draft: PersonalInfoDraft, today: NaiveDate) {
        assert!(validate_personal(&valid_draft, today).passed());
    }

    #[rstest]
    #[case(date(2008, 10, 16), true)]
    #[case(date(2008, 10, 17), false)]
    #[case(date(2000, 1, 1), true)]
    fn sixteenth_birthday_counts(
        mut valid_draft: PersonalInfoDraft,
        today: NaiveDate,
        #[case] birth: NaiveDate,
        #[case] accepted: bool,
    ) {
        valid_draft.birth_date = Some(birth);
        let report = validate_personal(&valid_draft, today);
        assert_eq!(report.passed(), accepted);
        assert_eq!(report.errors.contains("birth_date"), !accepted);
    }

    #[rstest]
    fn serialised_draft_with_codes_passes(today: NaiveDate) {
        let draft: PersonalInfoDraft = serde_json::from_value(serde_json::json!({
            "familyName": "Dubois",
            "givenNames": ["Marie"],
            "sex": "F",
            "birthDate": "2000-01-01",
            "nationality": "Française",
            "identityDocument": "cni",
        }))
        .expect("draft parses");

        let report = validate_personal(&draft, today);

        assert!(report.errors.is_empty(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[rstest]
    #[case("Dupont")]
    #[case("Lefèvre-Bérénice")]
    #[case("Ødegård")]
    #[case("Le Goff")]
    fn family_name_accepts_latin_letters(
        mut valid_draft: PersonalInfoDraft,
        today: NaiveDate,
        #[case] name: &str,
    ) {
        valid_draft.family_name = name.into();
        assert!(!validate_personal(&valid_draft, today).errors.contains("family_name"));
    }

    #[rstest]
    #[case("")]
    #[case("Dupont3")]
    #[case("O'Brien")]
    #[case("Иванов")]
    #[case("Nguyễn")]
    fn family_name_rejects_other_characters(
        mut valid_draft: PersonalInfoDraft,
        today: NaiveDate,
        #[case] name: &str,
    ) {
        valid_draft.family_name = name.into();
        assert!(validate_personal(&valid_draft, today).errors.contains("family_name"));
    }

    #[rstest]
    fn one_non_blank_given_name_suffices(mut valid_draft: PersonalInfoDraft, today: NaiveDate) {
        valid_draft.given_names = vec!["  ".into(), "Claire".into()];
        assert!(validate_personal(&valid_draft, today).passed());

        valid_draft.given_names = vec!["  ".into(), String::new()];
        assert!(validate_personal(&valid_draft, today).errors.contains("given_names"));
    }

    #[rstest]
    fn blank_draft_reports_every_field(today: NaiveDate) {
        let report = validate_personal(&PersonalInfoDraft::default(), today);
        let keys: Vec<_> = report.errors.keys().collect();
        assert_eq!(
            keys,
            vec![
                "birth_date",
                "family_name",
                "given_names",
                "identity_document",
                "nationality",
                "sex",
            ]
        );
    }

    #[rstest]
    fn validation_is_idempotent(today: NaiveDate) {
        let draft = PersonalInfoDraft {
            family_name: "X1".into(),
            ..PersonalInfoDraft::default()
        };
        assert_eq!(validate_personal(&draft, today), validate_personal(&draft, today));
    }
}
