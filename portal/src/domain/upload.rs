//! Simulated document transfer and verification.
//!
//! The uploader drives one accepted attempt: progress advances in steps of
//! [`PROGRESS_STEP`] with a fixed tick delay, then a verification delay
//! precedes the verifier's verdict. Slot bookkeeping stays in
//! [`DocumentSlots`](super::documents::DocumentSlots), so stale attempts are
//! filtered there.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::documents::{
    DocumentKind, DocumentStatus, SelectedFile, SharedSlots, UploadRejection, UploadTicket,
};
use super::ports::{DocumentVerifier, Sleeper};

/// Progress increment per tick, in percent.
pub const PROGRESS_STEP: u8 = 10;

/// Delays applied while uploading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTiming {
    /// Delay before each progress increment.
    pub tick: Duration,
    /// Delay between the end of the transfer and the verdict.
    pub verification: Duration,
}

impl Default for UploadTiming {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(100),
            verification: Duration::from_millis(500),
        }
    }
}

/// Drives upload attempts through transfer and verification.
#[derive(Clone)]
pub struct DocumentUploader {
    verifier: Arc<dyn DocumentVerifier>,
    sleeper: Arc<dyn Sleeper>,
    timing: UploadTiming,
}

impl DocumentUploader {
    /// Uploader verifying through `verifier` and waiting through `sleeper`.
    pub fn new(
        verifier: Arc<dyn DocumentVerifier>,
        sleeper: Arc<dyn Sleeper>,
        timing: UploadTiming,
    ) -> Self {
        Self {
            verifier,
            sleeper,
            timing,
        }
    }

    /// Run the transfer and verification for `ticket`.
    ///
    /// `on_progress` receives 10, 20, ... 100. The returned verdict carries
    /// the error message to record when verification fails.
    pub async fn transfer(
        &self,
        ticket: &UploadTicket,
        mut on_progress: impl FnMut(u8) + Send,
    ) -> Result<(), String> {
        let mut progress = 0_u8;
        while progress < 100 {
            self.sleeper.sleep(self.timing.tick).await;
            progress = progress.saturating_add(PROGRESS_STEP).min(100);
            on_progress(progress);
        }
        debug!(kind = %ticket.kind, attempt = %ticket.attempt, "transfer complete, verifying");

        self.sleeper.sleep(self.timing.verification).await;
        self.verifier
            .verify(ticket.kind, &ticket.file)
            .await
            .map_err(|error| error.to_string())
    }

    /// Check, transfer and verify `file` into the slot for `kind`.
    ///
    /// Files failing the synchronous checks are recorded as errors without
    /// any transfer. The slots are only locked between suspension points,
    /// so other kinds may upload concurrently and the slot may be cleared
    /// mid-flight, in which case the verdict is dropped.
    pub async fn upload(
        &self,
        slots: &SharedSlots,
        kind: DocumentKind,
        file: SelectedFile,
    ) -> Result<DocumentStatus, UploadRejection> {
        let ticket = slots
            .with(|slots| slots.begin_upload(kind, file))
            .inspect_err(|rejection| {
                info!(%kind, %rejection, "document rejected before upload");
            })?;

        let verdict = self
            .transfer(&ticket, |progress| {
                slots.with(|slots| slots.record_progress(ticket.kind, ticket.attempt, progress));
            })
            .await;

        match &verdict {
            Ok(()) => info!(%kind, file = %ticket.file.name, "document verified"),
            Err(message) => {
                warn!(%kind, file = %ticket.file.name, %message, "document verification failed");
            }
        }
        let applied = slots.with(|slots| slots.resolve(ticket.kind, ticket.attempt, verdict));
        if !applied {
            debug!(%kind, attempt = %ticket.attempt, "verdict for superseded attempt dropped");
        }
        Ok(slots.status(kind))
    }
}
