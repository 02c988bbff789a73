//! Periodic expiry sweep for OTP sessions.
//!
//! Runs `delete_expired` on a timer. Storage-side TTL mechanisms are
//! expected to mirror this where available; the sweep is best-effort
//! housekeeping, not a correctness point - `verify` re-checks expiry
//! synchronously on every call.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::errors::OtpResult;
use crate::repositories::OtpSessionRepository;

/// Configuration for the session cleanup sweeper
#[derive(Debug, Clone)]
pub struct SessionCleanupConfig {
    /// How often to run the sweep (in seconds)
    pub interval_seconds: u64,
    /// Whether the background task runs at all
    pub enabled: bool,
}

impl Default for SessionCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
            enabled: true,
        }
    }
}

/// Background service sweeping expired sessions
pub struct SessionCleanupService<R: OtpSessionRepository + 'static> {
    repository: Arc<R>,
    config: SessionCleanupConfig,
}

impl<R: OtpSessionRepository> SessionCleanupService<R> {
    /// Create a new cleanup service
    pub fn new(repository: Arc<R>, config: SessionCleanupConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single sweep cycle.
    pub async fn run_cleanup(&self) -> OtpResult<usize> {
        let swept = self.repository.delete_expired().await?;
        if swept > 0 {
            info!(swept = swept, "Expiry sweep removed sessions");
        }
        Ok(swept)
    }

    /// Spawn the sweeper as a background tokio task.
    ///
    /// Failures are logged and swallowed; the next tick retries.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Session cleanup sweeper is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "Session cleanup sweeper started"
            );

            let mut ticker = tokio::time::interval(interval);

            loop {
                ticker.tick().await;

                if let Err(e) = self.run_cleanup().await {
                    error!(error = %e, "Expiry sweep failed; will retry next tick");
                }
            }
        });
    }
}
