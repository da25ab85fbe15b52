//! Document slots and the per-kind upload state machine.
//!
//! A slot is either empty (not yet attempted) or holds one
//! [`DocumentRecord`]. Records move `uploading -> success | error`; files that
//! fail the synchronous checks go straight to `error` and never upload.
//! Every attempt carries a fresh [`AttemptId`] so that progress or verdicts
//! belonging to a replaced attempt are ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Largest accepted file, in bytes (5 MiB).
pub const MAX_DOCUMENT_BYTES: u64 = 5 * 1024 * 1024;

/// Message recorded when the verification collaborator rejects a document.
pub const NON_CONFORMANT_MESSAGE: &str = "document non-conformant";

const PDF: &[&str] = &[".pdf"];
const IMAGES: &[&str] = &[".jpg", ".jpeg", ".png"];

/// Kind of official document requested by the documents step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Baccalaureate diploma.
    Baccalaureate,
    /// Front side of the national identity card.
    IdCardFront,
    /// Back side of the national identity card.
    IdCardBack,
    /// Birth certificate.
    BirthCertificate,
    /// Identity photograph.
    IdentityPhoto,
    /// Higher-education diplomas, when applicable.
    HigherDiplomas,
}

impl DocumentKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 6] = [
        Self::Baccalaureate,
        Self::IdCardFront,
        Self::IdCardBack,
        Self::BirthCertificate,
        Self::IdentityPhoto,
        Self::HigherDiplomas,
    ];

    /// Whether the documents step requires a validated upload of this kind.
    pub fn is_required(self) -> bool {
        !matches!(self, Self::HigherDiplomas)
    }

    /// Lower-case extensions accepted for this kind, dot included.
    pub fn accepted_extensions(self) -> &'static [&'static str] {
        match self {
            Self::Baccalaureate | Self::BirthCertificate | Self::HigherDiplomas => PDF,
            Self::IdCardFront | Self::IdCardBack | Self::IdentityPhoto => IMAGES,
        }
    }

    /// Stable snake-case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Baccalaureate => "baccalaureate",
            Self::IdCardFront => "id_card_front",
            Self::IdCardBack => "id_card_back",
            Self::BirthCertificate => "birth_certificate",
            Self::IdentityPhoto => "identity_photo",
            Self::HigherDiplomas => "higher_diplomas",
        }
    }

    /// Label printed on the receipt.
    pub fn label(self) -> &'static str {
        match self {
            Self::Baccalaureate => "Diplôme du Baccalauréat",
            Self::IdCardFront => "CNI Recto",
            Self::IdCardBack => "CNI Verso",
            Self::BirthCertificate => "Acte de Naissance",
            Self::IdentityPhoto => "Photo d'Identité",
            Self::HigherDiplomas => "Diplômes Supérieurs",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File chosen by the applicant for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFile {
    /// Original file name, extension included.
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
}

impl SelectedFile {
    /// Build a selection from its parts.
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }

    /// Lower-cased extension with its leading dot, if the name has one.
    pub fn extension(&self) -> Option<String> {
        let (stem, extension) = self.name.rsplit_once('.')?;
        if stem.is_empty() || extension.is_empty() {
            return None;
        }
        Some(format!(".{}", extension.to_lowercase()))
    }
}

/// Identity of one upload attempt for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(Uuid);

impl AttemptId {
    /// Generate a fresh attempt identity.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Upload status of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Nothing attempted yet.
    Pending,
    /// Transfer in flight; progress in percent.
    Uploading {
        /// Percent transferred, 0 to 100.
        progress: u8,
    },
    /// Transferred and verified.
    Success,
    /// Rejected by the synchronous checks or by verification.
    Error {
        /// Reason shown next to the slot.
        message: String,
    },
}

/// Tracked state of one document slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Slot this record fills.
    pub kind: DocumentKind,
    /// Attempt that produced this record.
    pub attempt: AttemptId,
    /// Selected file name.
    pub file_name: String,
    /// Selected file size in bytes.
    pub size_bytes: u64,
    /// Current status.
    pub status: DocumentStatus,
}

impl DocumentRecord {
    /// Whether the record reached `success`.
    pub fn is_validated(&self) -> bool {
        matches!(self.status, DocumentStatus::Success)
    }

    /// Error message, when the record is in `error`.
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            DocumentStatus::Error { message } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Reasons a selected file never enters `uploading`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    /// File exceeds [`MAX_DOCUMENT_BYTES`].
    #[error("file too large ({size_bytes} bytes, max 5 MB)")]
    TooLarge {
        /// Size of the rejected file.
        size_bytes: u64,
    },
    /// Extension is not accepted for the slot's kind.
    #[error("file type not allowed for {kind}: expected {expected}")]
    ExtensionNotAllowed {
        /// Slot kind.
        kind: DocumentKind,
        /// Accepted extensions joined with commas.
        expected: String,
    },
}

/// Handle for an upload that passed the synchronous checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    /// Slot being filled.
    pub kind: DocumentKind,
    /// Attempt identity recorded in the slot.
    pub attempt: AttemptId,
    /// Selected file.
    pub file: SelectedFile,
}

/// Run the synchronous size and extension checks for `kind`.
///
/// # Examples
/// ```
/// use portal::domain::{DocumentKind, SelectedFile, check_selected_file};
///
/// let ok = SelectedFile::new("bac.PDF", 1_024);
/// assert!(check_selected_file(DocumentKind::Baccalaureate, &ok).is_ok());
///
/// let wrong = SelectedFile::new("bac.png", 1_024);
/// assert!(check_selected_file(DocumentKind::Baccalaureate, &wrong).is_err());
/// ```
pub fn check_selected_file(kind: DocumentKind, file: &SelectedFile) -> Result<(), UploadRejection> {
    if file.size_bytes > MAX_DOCUMENT_BYTES {
        return Err(UploadRejection::TooLarge {
            size_bytes: file.size_bytes,
        });
    }
    let accepted = kind.accepted_extensions();
    let matches = file
        .extension()
        .is_some_and(|extension| accepted.contains(&extension.as_str()));
    if !matches {
        return Err(UploadRejection::ExtensionNotAllowed {
            kind,
            expected: accepted.join(","),
        });
    }
    Ok(())
}

/// Slots of the documents step, at most one record per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSlots(BTreeMap<DocumentKind, DocumentRecord>);

impl DocumentSlots {
    /// Empty slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild slots from previously merged records; later records win.
    pub fn from_records(records: impl IntoIterator<Item = DocumentRecord>) -> Self {
        Self(
            records
                .into_iter()
                .map(|record| (record.kind, record))
                .collect(),
        )
    }

    /// Start an attempt for `kind`.
    ///
    /// Files failing the synchronous checks replace the slot with an `error`
    /// record and return the rejection; accepted files replace it with an
    /// `uploading` record at 0 percent.
    pub fn begin_upload(
        &mut self,
        kind: DocumentKind,
        file: SelectedFile,
    ) -> Result<UploadTicket, UploadRejection> {
        let attempt = AttemptId::random();
        let status = match check_selected_file(kind, &file) {
            Ok(()) => DocumentStatus::Uploading { progress: 0 },
            Err(rejection) => {
                self.0.insert(
                    kind,
                    DocumentRecord {
                        kind,
                        attempt,
                        file_name: file.name,
                        size_bytes: file.size_bytes,
                        status: DocumentStatus::Error {
                            message: rejection.to_string(),
                        },
                    },
                );
                return Err(rejection);
            }
        };
        self.0.insert(
            kind,
            DocumentRecord {
                kind,
                attempt,
                file_name: file.name.clone(),
                size_bytes: file.size_bytes,
                status,
            },
        );
        Ok(UploadTicket {
            kind,
            attempt,
            file,
        })
    }

    /// Apply a progress update; returns `false` when the update is stale or
    /// would move progress backwards.
    pub fn record_progress(
        &mut self,
        kind: DocumentKind,
        attempt: AttemptId,
        progress: u8,
    ) -> bool {
        let Some(record) = self.live_record(kind, attempt) else {
            return false;
        };
        match record.status {
            DocumentStatus::Uploading { progress: current } if progress >= current => {
                record.status = DocumentStatus::Uploading {
                    progress: progress.min(100),
                };
                true
            }
            _ => false,
        }
    }

    /// Resolve an in-flight attempt; returns `false` when the attempt was
    /// replaced or removed in the meantime.
    pub fn resolve(
        &mut self,
        kind: DocumentKind,
        attempt: AttemptId,
        verdict: Result<(), String>,
    ) -> bool {
        let Some(record) = self.live_record(kind, attempt) else {
            return false;
        };
        if !matches!(record.status, DocumentStatus::Uploading { .. }) {
            return false;
        }
        record.status = match verdict {
            Ok(()) => DocumentStatus::Success,
            Err(message) => DocumentStatus::Error { message },
        };
        true
    }

    /// Clear the slot for `kind`, allowing a fresh upload.
    pub fn remove(&mut self, kind: DocumentKind) -> Option<DocumentRecord> {
        self.0.remove(&kind)
    }

    /// Record held for `kind`.
    pub fn get(&self, kind: DocumentKind) -> Option<&DocumentRecord> {
        self.0.get(&kind)
    }

    /// Status of `kind`, `Pending` when the slot is empty.
    pub fn status(&self, kind: DocumentKind) -> DocumentStatus {
        self.0
            .get(&kind)
            .map_or(DocumentStatus::Pending, |record| record.status.clone())
    }

    /// Records in kind order.
    pub fn records(&self) -> Vec<DocumentRecord> {
        self.0.values().cloned().collect()
    }

    fn live_record(
        &mut self,
        kind: DocumentKind,
        attempt: AttemptId,
    ) -> Option<&mut DocumentRecord> {
        self.0
            .get_mut(&kind)
            .filter(|record| record.attempt == attempt)
    }
}

/// Document slots shared between concurrent uploads and the step view.
///
/// The lock is only held for single bookkeeping calls, never across an
/// await, so uploads of different kinds interleave and a slot can be
/// removed while its attempt is in flight.
#[derive(Debug, Clone, Default)]
pub struct SharedSlots(Arc<Mutex<DocumentSlots>>);

impl SharedSlots {
    /// Share `slots`.
    pub fn new(slots: DocumentSlots) -> Self {
        Self(Arc::new(Mutex::new(slots)))
    }

    /// Run `f` against the slots under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut DocumentSlots) -> R) -> R {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Copy of the current slots, as handed to the documents step.
    pub fn snapshot(&self) -> DocumentSlots {
        self.with(|slots| slots.clone())
    }

    /// Status of `kind`.
    pub fn status(&self, kind: DocumentKind) -> DocumentStatus {
        self.with(|slots| slots.status(kind))
    }

    /// Clear the slot for `kind`.
    pub fn remove(&self, kind: DocumentKind) -> Option<DocumentRecord> {
        self.with(|slots| slots.remove(kind))
    }
}
