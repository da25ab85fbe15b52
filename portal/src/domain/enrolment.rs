//! The enrolment case aggregate and the drafts each wizard step edits.
//!
//! Every field of [`EnrollmentCase`] is optional: nothing becomes mandatory
//! until the step that owns it validates. Steps hand their draft to the
//! wizard, which turns it into a patch (an `EnrollmentCase` holding only the
//! step's fields) and merges it field by field.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::documents::{DocumentRecord, DocumentSlots};
use super::formation::{FormationList, FormationRecord};

/// Country preselected by the contact step.
pub const DEFAULT_COUNTRY: &str = "France";

/// Applicant sex as declared on the personal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Male.
    #[serde(rename = "M")]
    Male,
    /// Female.
    #[serde(rename = "F")]
    Female,
    /// Non-binary.
    #[serde(rename = "NB")]
    NonBinary,
}

impl Sex {
    /// Label printed on the receipt.
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Masculin",
            Self::Female => "Féminin",
            Self::NonBinary => "Non-binaire",
        }
    }
}

/// Identity document the applicant will present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentityDocumentType {
    /// National identity card.
    #[serde(rename = "cni")]
    NationalIdCard,
    /// Passport.
    #[serde(rename = "passeport")]
    Passport,
    /// Birth certificate.
    #[serde(rename = "acte_naissance")]
    BirthCertificate,
}

impl IdentityDocumentType {
    /// Label printed on the receipt.
    pub fn label(self) -> &'static str {
        match self {
            Self::NationalIdCard => "Carte Nationale d'Identité",
            Self::Passport => "Passeport",
            Self::BirthCertificate => "Acte de Naissance",
        }
    }
}

/// Person to contact in an emergency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyContact {
    /// Family name.
    pub family_name: String,
    /// Given name.
    pub given_name: String,
    /// Phone number.
    pub phone: String,
    /// Relationship to the applicant.
    pub relation: String,
}

/// Aggregated enrolment data collected across the wizard.
///
/// The same shape doubles as a merge patch: `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrollmentCase {
    /// Applicant family name.
    pub family_name: Option<String>,
    /// Given names in order.
    pub given_names: Option<Vec<String>>,
    /// Declared sex.
    pub sex: Option<Sex>,
    /// Date of birth.
    pub birth_date: Option<NaiveDate>,
    /// Nationality as typed.
    pub nationality: Option<String>,
    /// Identity document held.
    pub identity_document: Option<IdentityDocumentType>,
    /// Validated document records.
    pub documents: Option<Vec<DocumentRecord>>,
    /// Last institution attended.
    pub last_institution: Option<String>,
    /// Prior-education entries.
    pub formations: Option<Vec<FormationRecord>>,
    /// Contact email.
    pub email: Option<String>,
    /// Email typed a second time.
    pub email_confirmation: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Five-digit postal code.
    pub postal_code: Option<String>,
    /// Country of residence.
    pub country: Option<String>,
    /// Person to contact in an emergency.
    pub emergency_contact: Option<EmergencyContact>,
}

fn overwrite<T>(slot: &mut Option<T>, value: Option<T>) {
    if let Some(value) = value {
        *slot = Some(value);
    }
}

impl EnrollmentCase {
    /// Merge `patch` into the case: present fields overwrite, absent fields
    /// leave the existing value untouched. Nothing is ever deleted.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::EnrollmentCase;
    ///
    /// let mut case = EnrollmentCase {
    ///     family_name: Some("Dupont".into()),
    ///     ..EnrollmentCase::default()
    /// };
    /// case.merge(EnrollmentCase {
    ///     city: Some("Lyon".into()),
    ///     ..EnrollmentCase::default()
    /// });
    /// assert_eq!(case.family_name.as_deref(), Some("Dupont"));
    /// assert_eq!(case.city.as_deref(), Some("Lyon"));
    /// ```
    pub fn merge(&mut self, patch: EnrollmentCase) {
        let EnrollmentCase {
            family_name,
            given_names,
            sex,
            birth_date,
            nationality,
            identity_document,
            documents,
            last_institution,
            formations,
            email,
            email_confirmation,
            phone,
            address,
            city,
            postal_code,
            country,
            emergency_contact,
        } = patch;
        overwrite(&mut self.family_name, family_name);
        overwrite(&mut self.given_names, given_names);
        overwrite(&mut self.sex, sex);
        overwrite(&mut self.birth_date, birth_date);
        overwrite(&mut self.nationality, nationality);
        overwrite(&mut self.identity_document, identity_document);
        overwrite(&mut self.documents, documents);
        overwrite(&mut self.last_institution, last_institution);
        overwrite(&mut self.formations, formations);
        overwrite(&mut self.email, email);
        overwrite(&mut self.email_confirmation, email_confirmation);
        overwrite(&mut self.phone, phone);
        overwrite(&mut self.address, address);
        overwrite(&mut self.city, city);
        overwrite(&mut self.postal_code, postal_code);
        overwrite(&mut self.country, country);
        overwrite(&mut self.emergency_contact, emergency_contact);
    }

    /// Non-blank given names joined with `separator`.
    pub fn given_names_joined(&self, separator: &str) -> String {
        self.given_names
            .iter()
            .flatten()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Draft edited by the personal information step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfoDraft {
    /// Family name.
    pub family_name: String,
    /// Given names, the first one required.
    pub given_names: Vec<String>,
    /// Declared sex.
    pub sex: Option<Sex>,
    /// Date of birth.
    pub birth_date: Option<NaiveDate>,
    /// Nationality.
    pub nationality: String,
    /// Identity document held.
    pub identity_document: Option<IdentityDocumentType>,
}

impl PersonalInfoDraft {
    /// Prefill from previously merged data.
    pub fn from_case(case: &EnrollmentCase) -> Self {
        Self {
            family_name: case.family_name.clone().unwrap_or_default(),
            given_names: case
                .given_names
                .clone()
                .unwrap_or_else(|| vec![String::new()]),
            sex: case.sex,
            birth_date: case.birth_date,
            nationality: case.nationality.clone().unwrap_or_default(),
            identity_document: case.identity_document,
        }
    }

    /// Patch carrying this step's fields.
    pub fn into_patch(self) -> EnrollmentCase {
        EnrollmentCase {
            family_name: Some(self.family_name.trim().to_owned()),
            given_names: Some(self.given_names),
            sex: self.sex,
            birth_date: self.birth_date,
            nationality: Some(self.nationality),
            identity_document: self.identity_document,
            ..EnrollmentCase::default()
        }
    }
}

/// Draft edited by the academic step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AcademicDraft {
    /// Last institution attended.
    pub last_institution: String,
    /// Prior-education entries.
    pub formations: FormationList,
}

impl AcademicDraft {
    /// Prefill from previously merged data.
    pub fn from_case(case: &EnrollmentCase) -> Self {
        Self {
            last_institution: case.last_institution.clone().unwrap_or_default(),
            formations: case.formations.clone().unwrap_or_default().into(),
        }
    }

    /// Patch carrying this step's fields.
    pub fn into_patch(self) -> EnrollmentCase {
        EnrollmentCase {
            last_institution: Some(self.last_institution),
            formations: Some(self.formations.as_slice().to_vec()),
            ..EnrollmentCase::default()
        }
    }
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_owned()
}

/// Draft edited by the contact step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Email typed a second time.
    #[serde(default)]
    pub email_confirmation: String,
    /// French phone number.
    #[serde(default)]
    pub phone: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// City.
    #[serde(default)]
    pub city: String,
    /// Five-digit postal code.
    #[serde(default)]
    pub postal_code: String,
    /// Country, France unless changed.
    #[serde(default = "default_country")]
    pub country: String,
    /// Person to contact in an emergency.
    #[serde(default)]
    pub emergency_contact: EmergencyContact,
}

impl Default for ContactDraft {
    fn default() -> Self {
        Self {
            email: String::new(),
            email_confirmation: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            postal_code: String::new(),
            country: default_country(),
            emergency_contact: EmergencyContact::default(),
        }
    }
}

impl ContactDraft {
    /// Prefill from previously merged data.
    pub fn from_case(case: &EnrollmentCase) -> Self {
        Self {
            email: case.email.clone().unwrap_or_default(),
            email_confirmation: case.email_confirmation.clone().unwrap_or_default(),
            phone: case.phone.clone().unwrap_or_default(),
            address: case.address.clone().unwrap_or_default(),
            city: case.city.clone().unwrap_or_default(),
            postal_code: case.postal_code.clone().unwrap_or_default(),
            country: case.country.clone().unwrap_or_else(default_country),
            emergency_contact: case.emergency_contact.clone().unwrap_or_default(),
        }
    }

    /// Patch carrying this step's fields.
    pub fn into_patch(self) -> EnrollmentCase {
        EnrollmentCase {
            email: Some(self.email.trim().to_owned()),
            email_confirmation: Some(self.email_confirmation.trim().to_owned()),
            phone: Some(self.phone),
            address: Some(self.address),
            city: Some(self.city),
            postal_code: Some(self.postal_code),
            country: Some(self.country),
            emergency_contact: Some(self.emergency_contact),
            ..EnrollmentCase::default()
        }
    }
}

/// Prefill the documents step from previously merged records.
pub fn document_slots_from_case(case: &EnrollmentCase) -> DocumentSlots {
    DocumentSlots::from_records(case.documents.clone().unwrap_or_default())
}

/// Patch carrying the documents step's records.
pub fn documents_patch(slots: &DocumentSlots) -> EnrollmentCase {
    EnrollmentCase {
        documents: Some(slots.records()),
        ..EnrollmentCase::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn merge_round_trip_keeps_old_keys_and_reflects_new_ones() {
        let mut case = EnrollmentCase {
            family_name: Some("Martin".into()),
            nationality: Some("Française".into()),
            ..EnrollmentCase::default()
        };
        case.merge(EnrollmentCase {
            nationality: Some("Belge".into()),
            city: Some("Paris".into()),
            ..EnrollmentCase::default()
        });

        assert_eq!(case.family_name.as_deref(), Some("Martin"));
        assert_eq!(case.nationality.as_deref(), Some("Belge"));
        assert_eq!(case.city.as_deref(), Some("Paris"));
    }

    #[rstest]
    fn empty_patch_changes_nothing() {
        let mut case = EnrollmentCase {
            email: Some("a@b.fr".into()),
            ..EnrollmentCase::default()
        };
        let before = case.clone();
        case.merge(EnrollmentCase::default());
        assert_eq!(case, before);
    }

    #[rstest]
    fn contact_draft_defaults_country() {
        let draft: ContactDraft = serde_json::from_str(r#"{"email": "a@b.fr"}"#)
            .expect("partial contact draft");
        assert_eq!(draft.country, DEFAULT_COUNTRY);
        assert_eq!(ContactDraft::default().country, DEFAULT_COUNTRY);
    }

    #[rstest]
    #[case("M", Sex::Male)]
    #[case("F", Sex::Female)]
    #[case("NB", Sex::NonBinary)]
    fn sex_codes_deserialise(#[case] code: &str, #[case] expected: Sex) {
        let parsed: Sex = serde_json::from_value(serde_json::json!(code)).expect("known code");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case("cni", IdentityDocumentType::NationalIdCard)]
    #[case("passeport", IdentityDocumentType::Passport)]
    #[case("acte_naissance", IdentityDocumentType::BirthCertificate)]
    fn identity_document_codes_deserialise(
        #[case] code: &str,
        #[case] expected: IdentityDocumentType,
    ) {
        let parsed: IdentityDocumentType =
            serde_json::from_value(serde_json::json!(code)).expect("known code");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn unknown_identity_document_is_rejected() {
        let parsed = serde_json::from_value::<IdentityDocumentType>(serde_json::json!("permis"));
        assert!(parsed.is_err());
    }

    #[rstest]
    fn personal_prefill_round_trips_through_patch() {
        let draft = PersonalInfoDraft {
            family_name: "Dupont".into(),
            given_names: vec!["Marie".into(), "Claire".into()],
            sex: Some(Sex::Female),
            birth_date: NaiveDate::from_ymd_opt(2004, 3, 15),
            nationality: "Française".into(),
            identity_document: Some(IdentityDocumentType::Passport),
        };
        let mut case = EnrollmentCase::default();
        case.merge(draft.clone().into_patch());

        assert_eq!(PersonalInfoDraft::from_case(&case), draft);
        assert_eq!(case.given_names_joined(" "), "Marie Claire");
    }
}
