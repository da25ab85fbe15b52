//! Contact details step.

use std::sync::OnceLock;

use regex::Regex;

use super::{is_blank, is_french_phone, is_well_formed_email};
use crate::domain::{ContactDraft, ValidationErrorSet, ValidationReport};

static POSTAL_CODE_RE: OnceLock<Regex> = OnceLock::new();

fn postal_code_regex() -> &'static Regex {
    POSTAL_CODE_RE.get_or_init(|| {
        Regex::new(r"^[0-9]{5}$")
            .unwrap_or_else(|error| panic!("postal code regex failed to compile: {error}"))
    })
}

/// Validate the contact draft, emergency contact included.
pub fn validate_contact(draft: &ContactDraft) -> ValidationReport {
    let mut errors = ValidationErrorSet::new();

    let email = draft.email.trim();
    if email.is_empty() {
        errors.insert("email", "email is required");
    } else if !is_well_formed_email(email) {
        errors.insert("email", "email is not valid");
    }

    let confirmation = draft.email_confirmation.trim();
    if confirmation.is_empty() {
        errors.insert("email_confirmation", "email confirmation is required");
    } else if confirmation != email {
        errors.insert("email_confirmation", "emails do not match");
    }

    check_phone(&mut errors, "phone", &draft.phone);

    if is_blank(&draft.address) {
        errors.insert("address", "address is required");
    }
    if is_blank(&draft.city) {
        errors.insert("city", "city is required");
    }

    if is_blank(&draft.postal_code) {
        errors.insert("postal_code", "postal code is required");
    } else if !postal_code_regex().is_match(&draft.postal_code) {
        errors.insert("postal_code", "postal code must be exactly 5 digits");
    }

    let emergency = &draft.emergency_contact;
    if is_blank(&emergency.family_name) {
        errors.insert("emergency_contact.family_name", "emergency contact family name is required");
    }
    if is_blank(&emergency.given_name) {
        errors.insert("emergency_contact.given_name", "emergency contact given name is required");
    }
    check_phone(&mut errors, "emergency_contact.phone", &emergency.phone);
    if is_blank(&emergency.relation) {
        errors.insert("emergency_contact.relation", "emergency contact relation is required");
    }

    ValidationReport::from_errors(errors)
}

fn check_phone(errors: &mut ValidationErrorSet, key: &str, phone: &str) {
    if is_blank(phone) {
        errors.insert(key, "phone number is required");
    } else if !is_french_phone(phone) {
        errors.insert(key, "phone number is not valid");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmergencyContact;
    use rstest::{fixture, rstest};

    #[fixture]
    fn valid_draft() -> ContactDraft {
        ContactDraft {
            email: "marie.dupont@example.fr".into(),
            email_confirmation: "marie.dupont@example.fr".into(),
            phone: "06 12 34 56 78".into(),
            address: "12 rue de la Paix".into(),
            city: "Paris".into(),
            postal_code: "75001".into(),
            emergency_contact: EmergencyContact {
                family_name: "Dupont".into(),
                given_name: "Jean".into(),
                phone: "+33612345679".into(),
                relation: "Père".into(),
            },
            ..ContactDraft::default()
        }
    }

    #[rstest]
    fn valid_draft_passes(valid_draft: ContactDraft) {
        assert!(validate_contact(&valid_draft).passed());
    }

    #[rstest]
    #[case("7500", false)]
    #[case("75001", true)]
    #[case("750011", false)]
    #[case("75 001", false)]
    fn postal_code_needs_five_digits(
        mut valid_draft: ContactDraft,
        #[case] code: &str,
        #[case] accepted: bool,
    ) {
        valid_draft.postal_code = code.into();
        assert_eq!(!validate_contact(&valid_draft).errors.contains("postal_code"), accepted);
    }

    #[rstest]
    #[case("0612345678", true)]
    #[case("+33 6 12 34 56 78", true)]
    #[case("0012345678", false)]
    #[case("061234567", false)]
    #[case("+44612345678", false)]
    fn phone_pattern(
        mut valid_draft: ContactDraft,
        #[case] phone: &str,
        #[case] accepted: bool,
    ) {
        valid_draft.phone = phone.into();
        assert_eq!(!validate_contact(&valid_draft).errors.contains("phone"), accepted);
    }

    #[rstest]
    fn mismatched_confirmation_is_reported(mut valid_draft: ContactDraft) {
        valid_draft.email_confirmation = "other@example.fr".into();
        let report = validate_contact(&valid_draft);
        assert_eq!(report.errors.get("email_confirmation"), Some("emails do not match"));
    }

    #[rstest]
    fn differing_domains_fail_only_the_confirmation(mut valid_draft: ContactDraft) {
        valid_draft.email = "a@b.com".into();
        valid_draft.email_confirmation = "a@c.com".into();

        let report = validate_contact(&valid_draft);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors.get("email_confirmation"), Some("emails do not match"));
    }

    #[rstest]
    #[case("no-at-sign.fr")]
    #[case("a b@example.fr")]
    #[case("a@nodot")]
    fn malformed_email_is_rejected(mut valid_draft: ContactDraft, #[case] email: &str) {
        valid_draft.email = email.into();
        valid_draft.email_confirmation = email.into();
        let report = validate_contact(&valid_draft);
        assert_eq!(report.errors.get("email"), Some("email is not valid"));
    }

    #[rstest]
    fn emergency_contact_fields_are_required(mut valid_draft: ContactDraft) {
        valid_draft.emergency_contact = EmergencyContact::default();
        let report = validate_contact(&valid_draft);
        assert_eq!(report.errors.len(), 4);
        assert!(report.errors.contains("emergency_contact.phone"));
    }
}
