//! Simulated submission of a completed enrolment case.
//!
//! Submission walks seven ordered stages, each behind a fixed delay, then
//! draws the outcome from the [`RandomSource`]. A failed run can be retried;
//! a successful run is terminal.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::case_reference::{CaseReference, SUFFIX_LEN};
use super::error::DomainError;
use super::ports::{RandomSource, Sleeper};

/// Percent chance that a submission succeeds.
pub const SUCCESS_PERCENT: u8 = 95;

/// Message carried by failed results.
pub const FAILURE_MESSAGE: &str = "submission failed, please try again";

/// Ordered pseudo-stages shown while submitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStage {
    /// Personal information check.
    IdentityCheck,
    /// Document verification.
    DocumentCheck,
    /// Academic background check.
    AcademicCheck,
    /// Contact details check.
    ContactCheck,
    /// Application file generation.
    DossierGeneration,
    /// Applicant notification.
    NotificationDispatch,
    /// Finalisation.
    Finalisation,
}

impl SubmissionStage {
    /// Every stage in execution order.
    pub const ALL: [Self; 7] = [
        Self::IdentityCheck,
        Self::DocumentCheck,
        Self::AcademicCheck,
        Self::ContactCheck,
        Self::DossierGeneration,
        Self::NotificationDispatch,
        Self::Finalisation,
    ];

    /// Progress message shown while the stage runs.
    pub fn label(self) -> &'static str {
        match self {
            Self::IdentityCheck => "checking personal information",
            Self::DocumentCheck => "verifying documents",
            Self::AcademicCheck => "checking academic background",
            Self::ContactCheck => "validating contact details",
            Self::DossierGeneration => "generating the application file",
            Self::NotificationDispatch => "sending notifications",
            Self::Finalisation => "finalising",
        }
    }
}

/// Progress reached once stage `index` (0-based) completes.
///
/// # Examples
/// ```
/// use portal::domain::stage_progress;
///
/// assert_eq!(stage_progress(0), 14);
/// assert_eq!(stage_progress(6), 100);
/// ```
pub fn stage_progress(index: usize) -> u8 {
    let total = SubmissionStage::ALL.len();
    let percent = (index.min(total - 1) + 1) * 100 / total;
    u8::try_from(percent).unwrap_or(100)
}

/// Whether a submission attempt went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// A case reference was issued.
    Success,
    /// The attempt failed and may be retried.
    Error,
}

/// Immutable record of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    /// Success or error.
    pub outcome: SubmissionOutcome,
    /// Present on success only.
    pub case_reference: Option<CaseReference>,
    /// When the attempt settled.
    pub timestamp: DateTime<Utc>,
    /// Present on failure only.
    pub message: Option<String>,
}

impl SubmissionResult {
    /// Whether a case reference was issued.
    pub fn is_success(&self) -> bool {
        self.outcome == SubmissionOutcome::Success
    }
}

/// Lifecycle of the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    /// Ready to run.
    Idle,
    /// A run is in progress, or was abandoned mid-stage.
    Submitting {
        /// Stage being waited on.
        stage: SubmissionStage,
        /// Progress reached so far.
        progress: u8,
    },
    /// Terminal success.
    Succeeded(SubmissionResult),
    /// Failed run awaiting [`SubmissionSimulator::retry`].
    Failed(SubmissionResult),
}

/// Runs the staged submission against injected time and randomness.
pub struct SubmissionSimulator {
    state: SubmissionState,
    sleeper: Arc<dyn Sleeper>,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    stage_delay: Duration,
}

impl SubmissionSimulator {
    /// Idle simulator waiting `stage_delay` per stage.
    pub fn new(
        sleeper: Arc<dyn Sleeper>,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
        stage_delay: Duration,
    ) -> Self {
        Self {
            state: SubmissionState::Idle,
            sleeper,
            random,
            clock,
            stage_delay,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Result of the last completed run, if any.
    pub fn result(&self) -> Option<&SubmissionResult> {
        match &self.state {
            SubmissionState::Succeeded(result) | SubmissionState::Failed(result) => Some(result),
            SubmissionState::Idle | SubmissionState::Submitting { .. } => None,
        }
    }

    /// Run every stage and settle the outcome.
    ///
    /// `on_stage` observes each stage with the progress reached after it.
    /// Only an idle simulator may run; call [`Self::retry`] after a failure.
    pub async fn run(
        &mut self,
        mut on_stage: impl FnMut(SubmissionStage, u8) + Send,
    ) -> Result<SubmissionResult, DomainError> {
        match self.state {
            SubmissionState::Idle => {}
            SubmissionState::Submitting { .. } => {
                return Err(DomainError::conflict("submission already in progress"));
            }
            SubmissionState::Succeeded(_) => {
                return Err(DomainError::conflict("case already submitted"));
            }
            SubmissionState::Failed(_) => {
                return Err(DomainError::conflict("retry the failed submission first"));
            }
        }

        let mut progress = 0;
        for (index, stage) in SubmissionStage::ALL.into_iter().enumerate() {
            self.state = SubmissionState::Submitting { stage, progress };
            self.sleeper.sleep(self.stage_delay).await;
            progress = stage_progress(index);
            self.state = SubmissionState::Submitting { stage, progress };
            debug!(stage = stage.label(), progress, "submission stage complete");
            on_stage(stage, progress);
        }

        let result = self.settle().inspect_err(|_| {
            self.state = SubmissionState::Idle;
        })?;
        self.state = if result.is_success() {
            info!(reference = ?result.case_reference, "submission succeeded");
            SubmissionState::Succeeded(result.clone())
        } else {
            warn!("submission failed");
            SubmissionState::Failed(result.clone())
        };
        Ok(result)
    }

    /// Discard a failed result and return to idle.
    ///
    /// A run whose future was dropped mid-stage leaves the simulator in
    /// `Submitting`; since `run` holds `&mut self`, no run can still be in
    /// flight here, so that state is cleared as well.
    pub fn retry(&mut self) -> Result<(), DomainError> {
        match self.state {
            SubmissionState::Failed(_) => {
                self.state = SubmissionState::Idle;
                Ok(())
            }
            SubmissionState::Submitting { stage, .. } => {
                warn!(stage = stage.label(), "clearing abandoned submission");
                self.state = SubmissionState::Idle;
                Ok(())
            }
            SubmissionState::Idle | SubmissionState::Succeeded(_) => Err(DomainError::conflict(
                "only a failed or abandoned submission can be retried",
            )),
        }
    }

    fn settle(&self) -> Result<SubmissionResult, DomainError> {
        let timestamp = self.clock.utc();
        if !self.random.chance(SUCCESS_PERCENT) {
            return Ok(SubmissionResult {
                outcome: SubmissionOutcome::Error,
                case_reference: None,
                timestamp,
                message: Some(FAILURE_MESSAGE.to_owned()),
            });
        }
        let suffix = self.random.alphanumeric(SUFFIX_LEN);
        let reference = CaseReference::new(timestamp.year(), &suffix)
            .map_err(|err| DomainError::internal(format!("random source produced {err}")))?;
        Ok(SubmissionResult {
            outcome: SubmissionOutcome::Success,
            case_reference: Some(reference),
            timestamp,
            message: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockRandomSource, MockSleeper};
    use crate::test_support::{FixedClock, StallingSleeper};
    use chrono::TimeZone;
    use regex::Regex;
    use rstest::rstest;

    fn clock() -> Arc<dyn Clock> {
        let now = Utc
            .with_ymd_and_hms(2025, 9, 1, 10, 0, 0)
            .single()
            .expect("valid time");
        Arc::new(FixedClock::new(now))
    }

    fn sleeper() -> Arc<dyn Sleeper> {
        let mut sleeper = MockSleeper::new();
        sleeper
            .expect_sleep()
            .withf(|delay| *delay == Duration::from_millis(800))
            .returning(|_| ());
        Arc::new(sleeper)
    }

    fn random(succeed: bool) -> Arc<dyn RandomSource> {
        let mut random = MockRandomSource::new();
        random
            .expect_chance()
            .withf(|percent| *percent == SUCCESS_PERCENT)
            .returning(move |_| succeed);
        random
            .expect_alphanumeric()
            .returning(|_| "K7Q2ZP".to_owned());
        Arc::new(random)
    }

    fn simulator(succeed: bool) -> SubmissionSimulator {
        SubmissionSimulator::new(sleeper(), random(succeed), clock(), Duration::from_millis(800))
    }

    #[rstest]
    fn progress_ends_at_exactly_one_hundred() {
        let progress: Vec<u8> = (0..7).map(stage_progress).collect();
        assert_eq!(progress, vec![14, 28, 42, 57, 71, 85, 100]);
    }

    #[rstest]
    #[tokio::test]
    async fn success_issues_reference_with_clock_year() {
        let mut sim = simulator(true);
        let mut stages = Vec::new();

        let result = sim
            .run(|stage, progress| stages.push((stage, progress)))
            .await
            .expect("idle simulator runs");

        assert!(result.is_success());
        let reference = result.case_reference.as_ref().expect("reference on success");
        let pattern = Regex::new(r"^INS-\d{4}-[A-Z0-9]{6}$").expect("valid pattern");
        assert!(pattern.is_match(reference.as_str()));
        assert_eq!(reference.as_str(), "INS-2025-K7Q2ZP");
        assert_eq!(stages.len(), 7);
        assert_eq!(stages.last(), Some(&(SubmissionStage::Finalisation, 100)));
        assert!(matches!(sim.state(), SubmissionState::Succeeded(_)));
    }

    #[rstest]
    #[tokio::test]
    async fn succeeded_simulator_cannot_rerun_or_retry() {
        let mut sim = simulator(true);
        sim.run(|_, _| {}).await.expect("first run");

        let rerun = sim.run(|_, _| {}).await.expect_err("terminal state");
        assert_eq!(rerun.code(), ErrorCode::Conflict);
        assert!(sim.retry().is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn failure_is_retryable_and_discards_result() {
        let mut sim = simulator(false);
        let result = sim.run(|_, _| {}).await.expect("idle simulator runs");
        assert!(!result.is_success());
        assert!(result.case_reference.is_none());

        let blocked = sim.run(|_, _| {}).await.expect_err("must retry first");
        assert_eq!(blocked.code(), ErrorCode::Conflict);

        sim.retry().expect("failed run can be retried");
        assert_eq!(sim.state(), &SubmissionState::Idle);
        assert!(sim.result().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn abandoned_run_can_be_cleared_by_retry() {
        let mut sim = SubmissionSimulator::new(
            Arc::new(StallingSleeper),
            random(true),
            clock(),
            Duration::from_millis(800),
        );

        let abandoned =
            tokio::time::timeout(Duration::from_millis(10), sim.run(|_, _| {})).await;
        assert!(abandoned.is_err());
        assert!(matches!(sim.state(), SubmissionState::Submitting { progress: 0, .. }));

        let blocked = sim.run(|_, _| {}).await.expect_err("stale run blocks");
        assert_eq!(blocked.code(), ErrorCode::Conflict);

        sim.retry().expect("abandoned run can be cleared");
        assert_eq!(sim.state(), &SubmissionState::Idle);
    }
}
