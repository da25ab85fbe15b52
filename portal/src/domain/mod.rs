//! Domain primitives, validators and services of the enrolment portal.
//!
//! Purpose: hold every rule of the portal independent of how it is driven.
//! Collaborators with side effects (time, randomness, storage, login) sit
//! behind the traits in [`ports`].
//!
//! Public surface:
//! - `WizardController` drives the five enrolment steps over an
//!   `EnrollmentCase`.
//! - `DocumentSlots` and `DocumentUploader` hold the upload state machine.
//! - `SubmissionSimulator` runs the staged submission; `render_receipt`
//!   turns a success into HTML.
//! - `AuthSession` scopes the signed-in user.
//! - `ApplicationBoard` answers admin dashboard queries.

pub mod applications;
pub mod auth;
pub mod case_reference;
pub mod contact;
pub mod documents;
pub mod enrolment;
pub mod error;
pub mod formation;
pub mod ports;
pub mod receipt;
pub mod session;
pub mod submission;
pub mod upload;
pub mod validation;
pub mod validators;
pub mod wizard;

pub use self::applications::{
    ApplicationBoard, ApplicationPage, ApplicationQuery, ApplicationStatus, ApplicationSummary,
    StatusCounts, StatusFilter, UnknownStatus,
};
pub use self::auth::{LoginCredentials, LoginValidationError, Role, SessionUser};
pub use self::case_reference::{CaseReference, CaseReferenceError};
pub use self::contact::{ContactVerifier, SUGGESTED_CITIES, address_suggestions};
pub use self::documents::{
    AttemptId, DocumentKind, DocumentRecord, DocumentSlots, DocumentStatus, MAX_DOCUMENT_BYTES,
    NON_CONFORMANT_MESSAGE, SelectedFile, SharedSlots, UploadRejection, UploadTicket,
    check_selected_file,
};
pub use self::enrolment::{
    AcademicDraft, ContactDraft, DEFAULT_COUNTRY, EmergencyContact, EnrollmentCase,
    IdentityDocumentType, PersonalInfoDraft, Sex,
};
pub use self::error::{DomainError, ErrorCode};
pub use self::formation::{FormationId, FormationList, FormationRecord};
pub use self::receipt::{Receipt, escape_html, render_receipt};
pub use self::session::AuthSession;
pub use self::submission::{
    SubmissionOutcome, SubmissionResult, SubmissionSimulator, SubmissionStage, SubmissionState,
    stage_progress,
};
pub use self::upload::{DocumentUploader, UploadTiming};
pub use self::validation::{FieldKey, ValidationErrorSet, ValidationReport, ValidationWarning};
pub use self::wizard::{
    AdvanceOutcome, StepBadge, StepDraft, WizardController, WizardError, WizardStep,
};
