//! Scripted walk through the enrolment wizard.
//!
//! An [`ApplicantScript`] holds everything an applicant would type or pick
//! across the five steps. [`run_script`] replays it against a wizard,
//! uploader and simulator, stopping at the first rejected step.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{
    AcademicDraft, ContactDraft, ContactVerifier, DocumentKind, DocumentStatus, DocumentUploader,
    PersonalInfoDraft, SelectedFile, SharedSlots, StepDraft, SubmissionResult,
    SubmissionSimulator, ValidationWarning, WizardController, WizardError,
};

/// File chosen for one document slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptedDocument {
    /// Slot to fill.
    pub kind: DocumentKind,
    /// File picked for it.
    pub file: SelectedFile,
}

/// Every draft and file an applicant submits, in step order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicantScript {
    /// Step 1 draft.
    pub personal: PersonalInfoDraft,
    /// Files uploaded on step 2, in order.
    pub documents: Vec<ScriptedDocument>,
    /// Step 3 draft.
    pub academic: AcademicDraft,
    /// Step 4 draft.
    pub contact: ContactDraft,
    /// Address suggestion picked on the contact step, applied over the
    /// typed address, city and postal code.
    pub address_choice: Option<String>,
}

/// Collaborators the script runs against.
pub struct ScriptServices<'a> {
    /// Uploads and verifies documents.
    pub uploader: &'a DocumentUploader,
    /// Confirms email and phone.
    pub contact: &'a ContactVerifier,
    /// Runs the submission.
    pub simulator: &'a mut SubmissionSimulator,
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutcome {
    /// Final status of each scripted document.
    pub documents: Vec<(DocumentKind, DocumentStatus)>,
    /// Whether the email address was confirmed.
    pub email_verified: bool,
    /// Whether the phone number was confirmed.
    pub phone_verified: bool,
    /// Warnings collected while advancing.
    pub warnings: Vec<ValidationWarning>,
    /// Submission attempts made, at least one.
    pub attempts: u32,
    /// Result of the last attempt.
    pub result: SubmissionResult,
}

/// Replay `script` and submit.
///
/// Documents whose verification fails are uploaded again, and failed
/// submissions retried, up to `max_attempts` times each. Files rejected
/// before transfer are not retried.
///
/// # Errors
///
/// Returns the first [`WizardError`], typically a step rejected with its
/// validation report.
pub async fn run_script(
    script: ApplicantScript,
    wizard: &mut WizardController,
    services: ScriptServices<'_>,
    max_attempts: u32,
) -> Result<ScriptOutcome, WizardError> {
    let ScriptServices {
        uploader,
        contact: verifier,
        simulator,
    } = services;
    let max_attempts = max_attempts.max(1);
    let mut warnings = Vec::new();

    warnings.extend(wizard.advance(StepDraft::PersonalInfo(script.personal))?.warnings);

    let slots = SharedSlots::new(wizard.document_slots());
    let mut documents = Vec::with_capacity(script.documents.len());
    for ScriptedDocument { kind, file } in script.documents {
        let status = upload_with_retries(uploader, &slots, kind, file, max_attempts).await;
        documents.push((kind, status));
    }
    warnings.extend(wizard.advance(StepDraft::Documents(slots.snapshot()))?.warnings);

    warnings.extend(wizard.advance(StepDraft::Academic(script.academic))?.warnings);

    let mut contact = script.contact;
    if let Some(choice) = script.address_choice.as_deref() {
        if !contact.select_address(choice) {
            warn!(choice, "address choice not recognised, keeping typed address");
        }
    }
    let email_verified = verifier.verify_email(&contact.email).await;
    let phone_verified = verifier.verify_phone(&contact.phone).await;
    warnings.extend(wizard.advance(StepDraft::Contact(contact))?.warnings);

    let mut attempts = 0;
    loop {
        attempts += 1;
        let result = wizard
            .submit(simulator, |stage, progress| {
                info!(stage = stage.label(), progress, "submitting");
            })
            .await?;
        if result.is_success() || attempts >= max_attempts {
            return Ok(ScriptOutcome {
                documents,
                email_verified,
                phone_verified,
                warnings,
                attempts,
                result,
            });
        }
        simulator.retry()?;
    }
}

async fn upload_with_retries(
    uploader: &DocumentUploader,
    slots: &SharedSlots,
    kind: DocumentKind,
    file: SelectedFile,
    max_attempts: u32,
) -> DocumentStatus {
    let mut status = DocumentStatus::Pending;
    for attempt in 1..=max_attempts {
        match uploader.upload(slots, kind, file.clone()).await {
            Ok(DocumentStatus::Success) => return DocumentStatus::Success,
            Ok(other) => {
                warn!(%kind, attempt, "upload attempt failed");
                status = other;
            }
            Err(_) => return slots.status(kind),
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use crate::domain::ports::FixtureDocumentVerifier;
    use crate::domain::{UploadTiming, WizardStep};
    use crate::test_support::{
        FixedClock, ImmediateSleeper, RecordingAutosave, ScriptedRandomSource, sample,
    };

    fn script() -> ApplicantScript {
        ApplicantScript {
            personal: sample::personal_draft(),
            documents: DocumentKind::ALL
                .into_iter()
                .filter(|kind| kind.is_required())
                .map(|kind| ScriptedDocument {
                    kind,
                    file: sample::file_for(kind),
                })
                .collect(),
            academic: sample::academic_draft(),
            contact: sample::contact_draft(),
            address_choice: None,
        }
    }

    struct Parts {
        wizard: WizardController,
        uploader: DocumentUploader,
        contact: ContactVerifier,
        simulator: SubmissionSimulator,
    }

    impl Parts {
        fn new(random: ScriptedRandomSource) -> Self {
            let now = Utc
                .with_ymd_and_hms(2025, 9, 1, 9, 0, 0)
                .single()
                .expect("valid time");
            let clock = Arc::new(FixedClock::new(now));
            Self {
                wizard: WizardController::new(
                    clock.clone(),
                    Arc::new(RecordingAutosave::default()),
                ),
                uploader: DocumentUploader::new(
                    Arc::new(FixtureDocumentVerifier),
                    Arc::new(ImmediateSleeper),
                    UploadTiming::default(),
                ),
                contact: ContactVerifier::new(Arc::new(ImmediateSleeper), Duration::ZERO),
                simulator: SubmissionSimulator::new(
                    Arc::new(ImmediateSleeper),
                    Arc::new(random),
                    clock,
                    Duration::ZERO,
                ),
            }
        }

        async fn run(
            &mut self,
            script: ApplicantScript,
            max_attempts: u32,
        ) -> Result<ScriptOutcome, WizardError> {
            let services = ScriptServices {
                uploader: &self.uploader,
                contact: &self.contact,
                simulator: &mut self.simulator,
            };
            run_script(script, &mut self.wizard, services, max_attempts).await
        }
    }

    #[rstest]
    #[tokio::test]
    async fn complete_script_submits_after_a_failed_attempt() {
        let mut parts = Parts::new(ScriptedRandomSource::new([false, true], true, "Q7K2ZP"));

        let outcome = parts.run(script(), 3).await.expect("script runs");

        assert_eq!(outcome.attempts, 2);
        assert!(outcome.result.is_success());
        assert!(outcome.email_verified);
        assert!(outcome.phone_verified);
        assert!(
            outcome
                .documents
                .iter()
                .all(|(_, status)| *status == DocumentStatus::Success)
        );
        assert_eq!(parts.wizard.current_step(), WizardStep::Validation);
        assert!(parts.wizard.receipt().is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_document_stops_at_documents_step() {
        let mut parts = Parts::new(ScriptedRandomSource::always("Q7K2ZP"));
        let mut incomplete = script();
        incomplete
            .documents
            .retain(|doc| doc.kind != DocumentKind::IdentityPhoto);

        let err = parts.run(incomplete, 3).await.expect_err("photo missing");

        let WizardError::Invalid { step, report } = err else {
            panic!("expected a validation rejection");
        };
        assert_eq!(step, WizardStep::Documents);
        assert!(report.errors.contains("identity_photo"));
        assert_eq!(parts.wizard.current_step(), WizardStep::Documents);
    }

    #[rstest]
    #[tokio::test]
    async fn address_choice_replaces_typed_address() {
        let mut parts = Parts::new(ScriptedRandomSource::always("Q7K2ZP"));
        let mut chosen = script();
        chosen.address_choice = Some("8 rue Royale, Marseille 13000".into());

        parts.run(chosen, 1).await.expect("script runs");

        let contact = parts.wizard.contact_draft();
        assert_eq!(contact.address, "8 rue Royale");
        assert_eq!(contact.city, "Marseille");
        assert_eq!(contact.postal_code, "13000");
    }

    #[rstest]
    #[tokio::test]
    async fn unrecognised_address_choice_keeps_typed_address() {
        let mut parts = Parts::new(ScriptedRandomSource::always("Q7K2ZP"));
        let mut chosen = script();
        chosen.address_choice = Some("somewhere".into());

        parts.run(chosen, 1).await.expect("script runs");

        assert_eq!(parts.wizard.contact_draft().postal_code, "75002");
    }

    #[rstest]
    fn script_parses_from_camel_case_json() {
        let json = r#"{
            "personal": {"familyName": "Dupont", "givenNames": ["Marie"], "sex": "F",
                         "birthDate": "2004-03-15", "nationality": "Française",
                         "identityDocument": "cni"},
            "documents": [
                {"kind": "identity_photo", "file": {"name": "photo.jpg", "sizeBytes": 1024}}
            ],
            "contact": {"email": "marie@example.fr"},
            "addressChoice": "8 rue Royale, Paris 75001"
        }"#;
        let parsed: ApplicantScript = serde_json::from_str(json).expect("script parses");
        assert_eq!(parsed.personal.family_name, "Dupont");
        assert_eq!(parsed.documents.len(), 1);
        assert_eq!(parsed.contact.country, "France");
        assert_eq!(parsed.address_choice.as_deref(), Some("8 rue Royale, Paris 75001"));
        assert!(parsed.academic.formations.is_empty());
    }
}
