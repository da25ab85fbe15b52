//! Port for suspending work for a fixed delay.
//!
//! Every simulated latency (login, upload ticks, verification, submission
//! stages) goes through this port so tests can run without wall-clock waits.

use std::time::Duration;

use async_trait::async_trait;

/// Async clock-independent sleeping abstraction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend execution for `duration`.
    async fn sleep(&self, duration: Duration);
}
