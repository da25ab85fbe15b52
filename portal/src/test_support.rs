//! Deterministic doubles and sample drafts shared by unit and integration
//! tests.
//!
//! Compiled for the crate's own tests and, through the `test-support`
//! feature, for `tests/`.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use mockable::Clock;

use crate::domain::EnrollmentCase;
use crate::domain::ports::{AutosaveError, AutosaveSink, RandomSource, Sleeper};

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("{what} mutex poisoned"),
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Clock reporting `now` forever.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Sleeper returning at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateSleeper;

#[async_trait]
impl Sleeper for ImmediateSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

/// Sleeper that never wakes, for abandoning futures mid-wait.
#[derive(Debug, Clone, Copy, Default)]
pub struct StallingSleeper;

#[async_trait]
impl Sleeper for StallingSleeper {
    async fn sleep(&self, _duration: Duration) {
        std::future::pending::<()>().await;
    }
}

/// Sleeper returning immediately while recording every requested delay.
#[derive(Default)]
pub struct RecordingSleeper(Mutex<Vec<Duration>>);

impl RecordingSleeper {
    /// Delays requested so far, in order.
    pub fn recorded(&self) -> Vec<Duration> {
        lock(&self.0, "sleeper").clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        lock(&self.0, "sleeper").push(duration);
    }
}

/// Random source replaying scripted draws.
///
/// Chance draws pop from the queue and fall back to `default_chance` once it
/// is empty; alphanumeric draws repeat `suffix` truncated or padded with `0`.
pub struct ScriptedRandomSource {
    chances: Mutex<VecDeque<bool>>,
    default_chance: bool,
    suffix: String,
}

impl ScriptedRandomSource {
    /// Source replaying `chances`, then `default_chance`, with `suffix`.
    pub fn new(
        chances: impl IntoIterator<Item = bool>,
        default_chance: bool,
        suffix: &str,
    ) -> Self {
        Self {
            chances: Mutex::new(chances.into_iter().collect()),
            default_chance,
            suffix: suffix.to_owned(),
        }
    }

    /// Source where every draw succeeds.
    pub fn always(suffix: &str) -> Self {
        Self::new([], true, suffix)
    }

    /// Queue more chance draws.
    pub fn push_chances(&self, chances: impl IntoIterator<Item = bool>) {
        lock(&self.chances, "random").extend(chances);
    }
}

impl RandomSource for ScriptedRandomSource {
    fn chance(&self, _percent: u8) -> bool {
        lock(&self.chances, "random")
            .pop_front()
            .unwrap_or(self.default_chance)
    }

    fn alphanumeric(&self, len: usize) -> String {
        self.suffix
            .chars()
            .chain(std::iter::repeat('0'))
            .take(len)
            .collect()
    }
}

/// Autosave sink keeping every snapshot.
#[derive(Default)]
pub struct RecordingAutosave(Mutex<Vec<EnrollmentCase>>);

impl RecordingAutosave {
    /// Snapshots scheduled so far.
    pub fn count(&self) -> usize {
        lock(&self.0, "autosave").len()
    }
}

impl AutosaveSink for RecordingAutosave {
    fn schedule(&self, snapshot: EnrollmentCase) -> Result<(), AutosaveError> {
        lock(&self.0, "autosave").push(snapshot);
        Ok(())
    }
}

pub mod sample {
    //! Valid drafts for every step, as an applicant would fill them in.

    use chrono::NaiveDate;

    use crate::domain::{
        AcademicDraft, ContactDraft, DocumentKind, DocumentSlots, EmergencyContact,
        FormationList, FormationRecord, IdentityDocumentType, PersonalInfoDraft, SelectedFile, Sex,
    };

    /// Personal details of an adult French applicant.
    pub fn personal_draft() -> PersonalInfoDraft {
        PersonalInfoDraft {
            family_name: "Dupont".into(),
            given_names: vec!["Marie".into(), "Claire".into()],
            sex: Some(Sex::Female),
            birth_date: NaiveDate::from_ymd_opt(2004, 3, 15),
            nationality: "Française".into(),
            identity_document: Some(IdentityDocumentType::NationalIdCard),
        }
    }

    /// File name with the first extension accepted for `kind`.
    pub fn file_for(kind: DocumentKind) -> SelectedFile {
        let extension = kind.accepted_extensions().first().copied().unwrap_or(".pdf");
        SelectedFile::new(format!("{}{extension}", kind.as_str()), 200 * 1024)
    }

    /// Slots where every required kind is verified.
    pub fn verified_slots() -> DocumentSlots {
        let mut slots = DocumentSlots::new();
        for kind in DocumentKind::ALL.into_iter().filter(|kind| kind.is_required()) {
            match slots.begin_upload(kind, file_for(kind)) {
                Ok(ticket) => {
                    slots.resolve(kind, ticket.attempt, Ok(()));
                }
                Err(rejection) => panic!("sample file rejected: {rejection}"),
            }
        }
        slots
    }

    /// One completed formation.
    pub fn academic_draft() -> AcademicDraft {
        AcademicDraft {
            last_institution: "Lycée Victor Hugo".into(),
            formations: FormationList::new(vec![FormationRecord {
                institution: "Lycée Victor Hugo".into(),
                specialisation: "Baccalauréat général".into(),
                level: "Terminale".into(),
                start_date: NaiveDate::from_ymd_opt(2019, 9, 1),
                end_date: NaiveDate::from_ymd_opt(2022, 7, 5),
                degree_obtained: true,
                ..FormationRecord::blank()
            }]),
        }
    }

    /// Paris contact details with a matching confirmation.
    pub fn contact_draft() -> ContactDraft {
        ContactDraft {
            email: "marie.dupont@example.fr".into(),
            email_confirmation: "marie.dupont@example.fr".into(),
            phone: "06 12 34 56 78".into(),
            address: "12 rue de la Paix".into(),
            city: "Paris".into(),
            postal_code: "75002".into(),
            emergency_contact: EmergencyContact {
                family_name: "Dupont".into(),
                given_name: "Jean".into(),
                phone: "0698765432".into(),
                relation: "Père".into(),
            },
            ..ContactDraft::default()
        }
    }
}
