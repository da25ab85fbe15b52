//! Autosave adapter spawning a delayed task on the ambient Tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::debug;

use crate::domain::EnrollmentCase;
use crate::domain::ports::{AutosaveError, AutosaveSink, Sleeper};

/// Simulates a remote save with a fixed latency.
///
/// Scheduling fails, without blocking, when no Tokio runtime is running.
pub struct SpawningAutosave {
    sleeper: Arc<dyn Sleeper>,
    latency: Duration,
}

impl SpawningAutosave {
    pub fn new(sleeper: Arc<dyn Sleeper>, latency: Duration) -> Self {
        Self { sleeper, latency }
    }
}

impl AutosaveSink for SpawningAutosave {
    fn schedule(&self, snapshot: EnrollmentCase) -> Result<(), AutosaveError> {
        let handle =
            Handle::try_current().map_err(|err| AutosaveError::unavailable(err.to_string()))?;
        let sleeper = Arc::clone(&self.sleeper);
        let latency = self.latency;
        handle.spawn(async move {
            sleeper.sleep(latency).await;
            debug!(
                family_name = snapshot.family_name.as_deref().unwrap_or_default(),
                "draft autosaved"
            );
        });
        Ok(())
    }
}
