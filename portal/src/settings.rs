//! Portal configuration loaded via OrthoConfig.
//!
//! Every value is optional; accessors fall back to the delays the portal
//! simulates by default.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::UploadTiming;

const DEFAULT_LOGIN_DELAY_MS: u64 = 1_000;
const DEFAULT_AUTOSAVE_LATENCY_MS: u64 = 1_000;
const DEFAULT_UPLOAD_TICK_MS: u64 = 100;
const DEFAULT_VERIFICATION_DELAY_MS: u64 = 500;
const DEFAULT_SUBMISSION_STAGE_DELAY_MS: u64 = 800;
const DEFAULT_CONTACT_VERIFICATION_DELAY_MS: u64 = 1_000;

/// Tunable delays and paths for the portal driver.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Simulated login latency in milliseconds.
    pub login_delay_ms: Option<u64>,
    /// Simulated autosave latency in milliseconds.
    pub autosave_latency_ms: Option<u64>,
    /// Delay between upload progress ticks in milliseconds.
    pub upload_tick_ms: Option<u64>,
    /// Delay before the verification verdict in milliseconds.
    pub verification_delay_ms: Option<u64>,
    /// Delay per submission stage in milliseconds.
    pub submission_stage_delay_ms: Option<u64>,
    /// Delay before an email or phone number is confirmed, in milliseconds.
    pub contact_verification_delay_ms: Option<u64>,
    /// Directory receiving rendered receipts.
    pub receipt_dir: Option<PathBuf>,
    /// Directory holding the session token file. In-memory when unset.
    pub token_dir: Option<PathBuf>,
    /// Seed making simulated outcomes reproducible.
    pub random_seed: Option<u64>,
}

impl PortalSettings {
    /// Simulated latency of a sign-in.
    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms.unwrap_or(DEFAULT_LOGIN_DELAY_MS))
    }

    /// Simulated latency of an autosave write.
    pub fn autosave_latency(&self) -> Duration {
        Duration::from_millis(self.autosave_latency_ms.unwrap_or(DEFAULT_AUTOSAVE_LATENCY_MS))
    }

    /// Upload tick and verification delays.
    pub fn upload_timing(&self) -> UploadTiming {
        UploadTiming {
            tick: Duration::from_millis(self.upload_tick_ms.unwrap_or(DEFAULT_UPLOAD_TICK_MS)),
            verification: Duration::from_millis(
                self.verification_delay_ms
                    .unwrap_or(DEFAULT_VERIFICATION_DELAY_MS),
            ),
        }
    }

    /// Delay per submission stage.
    pub fn submission_stage_delay(&self) -> Duration {
        Duration::from_millis(
            self.submission_stage_delay_ms
                .unwrap_or(DEFAULT_SUBMISSION_STAGE_DELAY_MS),
        )
    }

    /// Delay before an email or phone is confirmed.
    pub fn contact_verification_delay(&self) -> Duration {
        Duration::from_millis(
            self.contact_verification_delay_ms
                .unwrap_or(DEFAULT_CONTACT_VERIFICATION_DELAY_MS),
        )
    }

    /// Receipt directory, the working directory by default.
    pub fn receipt_dir(&self) -> PathBuf {
        self.receipt_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
