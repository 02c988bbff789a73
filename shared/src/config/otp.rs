//! OTP policy configuration

use serde::{Deserialize, Serialize};

/// Policy knobs for one-time-code sessions.
///
/// The TTL and attempt ceiling are process-wide; they are not
/// configurable per call.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Minutes before a session expires
    pub ttl_minutes: i64,

    /// Attempt ceiling per code lifetime
    pub max_attempts: i32,

    /// How often the expiry sweeper runs, in seconds
    pub cleanup_interval_seconds: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: 5,
            max_attempts: 3,
            cleanup_interval_seconds: 60,
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let ttl_minutes = std::env::var("OTP_TTL_MINUTES")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);
        let max_attempts = std::env::var("OTP_MAX_ATTEMPTS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .unwrap_or(3);
        let cleanup_interval_seconds = std::env::var("OTP_CLEANUP_INTERVAL_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .unwrap_or(60);

        Self {
            ttl_minutes,
            max_attempts,
            cleanup_interval_seconds,
        }
    }
}
