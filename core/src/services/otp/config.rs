//! Configuration for the OTP authorization service

use tx_shared::config::OtpConfig;

use crate::domain::entities::otp_session::{DEFAULT_TTL_MINUTES, MAX_ATTEMPTS};

/// Configuration for the OTP authorization service
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Minutes before a session expires; fixed, not configurable per call
    pub ttl_minutes: i64,
    /// Attempt ceiling per code lifetime
    pub max_attempts: i32,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_TTL_MINUTES,
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

impl From<&OtpConfig> for OtpServiceConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            ttl_minutes: config.ttl_minutes,
            max_attempts: config.max_attempts,
        }
    }
}
