//! The five-step enrolment wizard.
//!
//! [`WizardController`] exclusively owns the enrolment case and the step
//! pointer. Steps receive prefilled drafts, edit them, and hand them back to
//! [`WizardController::advance`], which validates, merges and moves on. The
//! aggregate is only read back through per-step prefills, the review badges
//! and the receipt.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::documents::DocumentSlots;
use super::enrolment::{
    AcademicDraft, ContactDraft, EnrollmentCase, PersonalInfoDraft, document_slots_from_case,
    documents_patch,
};
use super::error::DomainError;
use super::ports::AutosaveSink;
use super::receipt::{Receipt, render_receipt};
use super::submission::{SubmissionResult, SubmissionSimulator, SubmissionStage};
use super::validation::{ValidationReport, ValidationWarning};
use super::validators::{
    validate_academic, validate_contact, validate_documents, validate_personal,
};

/// Number of wizard steps.
pub const STEP_COUNT: u8 = 5;

/// Wizard step, numbered 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardStep {
    /// Identity of the applicant.
    PersonalInfo = 1,
    /// Official document uploads.
    Documents = 2,
    /// Prior education.
    Academic = 3,
    /// Contact details and emergency contact.
    Contact = 4,
    /// Review and submission.
    Validation = 5,
}

impl WizardStep {
    /// Every step in order.
    pub const ALL: [Self; 5] = [
        Self::PersonalInfo,
        Self::Documents,
        Self::Academic,
        Self::Contact,
        Self::Validation,
    ];

    /// 1-based position.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Step at 1-based `number`, if any.
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.number() == number)
    }

    /// Following step, `None` on the last.
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// Preceding step, `None` on the first.
    pub fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    /// Heading shown to the applicant.
    pub fn title(self) -> &'static str {
        match self {
            Self::PersonalInfo => "Informations personnelles",
            Self::Documents => "Documents officiels",
            Self::Academic => "Parcours académique",
            Self::Contact => "Coordonnées",
            Self::Validation => "Validation",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

/// Draft handed to [`WizardController::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepDraft {
    /// Edited personal information.
    PersonalInfo(PersonalInfoDraft),
    /// Document slots after uploading.
    Documents(DocumentSlots),
    /// Edited academic background.
    Academic(AcademicDraft),
    /// Edited contact details.
    Contact(ContactDraft),
    /// The review step carries no data.
    Validation,
}

impl StepDraft {
    /// Step owning this draft.
    pub fn step(&self) -> WizardStep {
        match self {
            Self::PersonalInfo(_) => WizardStep::PersonalInfo,
            Self::Documents(_) => WizardStep::Documents,
            Self::Academic(_) => WizardStep::Academic,
            Self::Contact(_) => WizardStep::Contact,
            Self::Validation => WizardStep::Validation,
        }
    }

    fn validate(&self, today: NaiveDate) -> ValidationReport {
        match self {
            Self::PersonalInfo(draft) => validate_personal(draft, today),
            Self::Documents(slots) => validate_documents(slots),
            Self::Academic(draft) => validate_academic(draft),
            Self::Contact(draft) => validate_contact(draft),
            Self::Validation => ValidationReport::default(),
        }
    }

    fn into_patch(self) -> EnrollmentCase {
        match self {
            Self::PersonalInfo(draft) => draft.into_patch(),
            Self::Documents(slots) => documents_patch(&slots),
            Self::Academic(draft) => draft.into_patch(),
            Self::Contact(draft) => draft.into_patch(),
            Self::Validation => EnrollmentCase::default(),
        }
    }
}

/// Errors returned by wizard navigation and submission.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    /// The draft failed validation; the report lists every failing field.
    #[error("step {step} has {} invalid field(s)", .report.errors.len())]
    Invalid {
        /// Step that was rejected.
        step: WizardStep,
        /// Errors and warnings raised.
        report: ValidationReport,
    },
    /// The draft belongs to another step.
    #[error("draft for step {found} submitted while on step {expected}")]
    StepMismatch {
        /// Current step.
        expected: WizardStep,
        /// Step the draft belongs to.
        found: WizardStep,
    },
    /// Advance attempted on the review step.
    #[error("already on the final step")]
    AtFinalStep,
    /// Retreat attempted on the first step.
    #[error("already on the first step")]
    AtFirstStep,
    /// Submit attempted before the review step.
    #[error("submission is only possible from the final step")]
    NotAtFinalStep,
    /// The simulator refused to run.
    #[error(transparent)]
    Submission(#[from] DomainError),
}

/// Successful advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceOutcome {
    /// Step now current.
    pub step: WizardStep,
    /// Non-blocking warnings raised by the validator.
    pub warnings: Vec<ValidationWarning>,
}

/// Review badge shown on the final step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepBadge {
    /// Step checked.
    pub step: WizardStep,
    /// Whether the step's validator passes on the current case.
    pub complete: bool,
}

/// Drives the wizard over one enrolment case.
pub struct WizardController {
    step: WizardStep,
    case: EnrollmentCase,
    result: Option<SubmissionResult>,
    clock: Arc<dyn Clock>,
    autosave: Arc<dyn AutosaveSink>,
}

impl WizardController {
    /// Wizard on step 1 with an empty case.
    pub fn new(clock: Arc<dyn Clock>, autosave: Arc<dyn AutosaveSink>) -> Self {
        Self {
            step: WizardStep::PersonalInfo,
            case: EnrollmentCase::default(),
            result: None,
            clock,
            autosave,
        }
    }

    /// Step the applicant is on.
    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    /// `current_step * 100 / 5`.
    pub fn progress_percent(&self) -> u8 {
        let percent = u16::from(self.step.number()) * 100 / u16::from(STEP_COUNT);
        u8::try_from(percent).unwrap_or(100)
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    /// Validate `draft` for the current step, merge it and move forward.
    ///
    /// Any validation error rejects the call and leaves the step and the
    /// case untouched.
    pub fn advance(&mut self, draft: StepDraft) -> Result<AdvanceOutcome, WizardError> {
        let Some(next) = self.step.next() else {
            return Err(WizardError::AtFinalStep);
        };
        if draft.step() != self.step {
            return Err(WizardError::StepMismatch {
                expected: self.step,
                found: draft.step(),
            });
        }

        let report = draft.validate(self.today());
        if !report.passed() {
            info!(
                step = self.step.number(),
                fields = ?report.errors.keys().collect::<Vec<_>>(),
                "step rejected"
            );
            return Err(WizardError::Invalid {
                step: self.step,
                report,
            });
        }

        self.case.merge(draft.into_patch());
        self.step = next;
        info!(step = next.number(), "advanced to step");
        self.signal_autosave();
        Ok(AdvanceOutcome {
            step: next,
            warnings: report.warnings,
        })
    }

    /// Move back one step, keeping merged data.
    pub fn retreat(&mut self) -> Result<WizardStep, WizardError> {
        let previous = self.step.previous().ok_or(WizardError::AtFirstStep)?;
        self.step = previous;
        debug!(step = previous.number(), "returned to step");
        Ok(previous)
    }

    /// Field-wise overwrite-if-present merge into the case.
    pub fn merge_step_data(&mut self, patch: EnrollmentCase) {
        self.case.merge(patch);
    }

    fn signal_autosave(&self) {
        if let Err(error) = self.autosave.schedule(self.case.clone()) {
            warn!(%error, "autosave failed");
        }
    }

    /// Personal information prefilled from the case.
    pub fn personal_draft(&self) -> PersonalInfoDraft {
        PersonalInfoDraft::from_case(&self.case)
    }

    /// Validated documents from the case, as slots.
    pub fn document_slots(&self) -> DocumentSlots {
        document_slots_from_case(&self.case)
    }

    /// Academic background prefilled from the case.
    pub fn academic_draft(&self) -> AcademicDraft {
        AcademicDraft::from_case(&self.case)
    }

    /// Contact details prefilled from the case.
    pub fn contact_draft(&self) -> ContactDraft {
        ContactDraft::from_case(&self.case)
    }

    /// Re-run the four step validators against the case for display.
    ///
    /// Empty unless the wizard is on the final step.
    pub fn step_badges(&self) -> Vec<StepBadge> {
        if self.step != WizardStep::Validation {
            return Vec::new();
        }
        let today = self.today();
        let checks = [
            StepDraft::PersonalInfo(self.personal_draft()),
            StepDraft::Documents(self.document_slots()),
            StepDraft::Academic(self.academic_draft()),
            StepDraft::Contact(self.contact_draft()),
        ];
        checks
            .into_iter()
            .map(|draft| StepBadge {
                step: draft.step(),
                complete: draft.validate(today).passed(),
            })
            .collect()
    }

    /// Submit the case from the final step.
    ///
    /// A successful result is kept for [`Self::receipt`]; a failed one is
    /// returned and the caller may retry through the simulator.
    pub async fn submit(
        &mut self,
        simulator: &mut SubmissionSimulator,
        on_stage: impl FnMut(SubmissionStage, u8) + Send,
    ) -> Result<SubmissionResult, WizardError> {
        if self.step != WizardStep::Validation {
            return Err(WizardError::NotAtFinalStep);
        }
        let result = simulator.run(on_stage).await?;
        if result.is_success() {
            self.result = Some(result.clone());
        }
        Ok(result)
    }

    /// Receipt for the successful submission, if any.
    pub fn receipt(&self) -> Option<Receipt> {
        self.result
            .as_ref()
            .and_then(|result| render_receipt(&self.case, result))
    }
}
