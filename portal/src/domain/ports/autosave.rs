//! Port receiving best-effort autosave signals from the wizard.
//!
//! Scheduling never blocks navigation: the wizard logs a returned error and
//! carries on.

use super::define_port_error;
use crate::domain::EnrollmentCase;

define_port_error! {
    /// Errors raised while scheduling an autosave.
    pub enum AutosaveError {
        /// No executor is available to run the save.
        Unavailable { message: String } => "autosave unavailable: {message}",
    }
}

/// Fire-and-forget sink for snapshots of the enrolment case.
#[cfg_attr(test, mockall::automock)]
pub trait AutosaveSink: Send + Sync {
    /// Schedule a save of `snapshot` without waiting for it.
    fn schedule(&self, snapshot: EnrollmentCase) -> Result<(), AutosaveError>;
}
