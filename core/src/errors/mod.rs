//! Error taxonomy for the OTP staging subsystem.
//!
//! Absent, expired, and already-verified sessions all surface as
//! `InvalidOrExpiredSession` so a brute-forcing client cannot probe
//! session state through error differences.

use thiserror::Error;

/// Errors returned by the OTP authorization operations
#[derive(Error, Debug)]
pub enum OtpError {
    /// Storage unavailable or failed; fatal to the call, never retried here
    #[error("Persistence failure: {message}")]
    Persistence { message: String },

    /// Token unknown, expired, or already verified - deliberately
    /// indistinguishable
    #[error("Invalid or expired session")]
    InvalidOrExpiredSession,

    /// Attempt ceiling reached; the session is destroyed as a side effect
    #[error("Maximum verification attempts exceeded")]
    AttemptsExceeded,

    /// Wrong code with attempts left; carries the countdown for the caller
    #[error("Invalid code, {remaining_attempts} attempt(s) remaining")]
    InvalidCode { remaining_attempts: i32 },

    /// Resend or delete against a token with no matching unverified record
    #[error("Invalid session")]
    InvalidSession,

    /// Precondition failure on caller-supplied input
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl OtpError {
    /// Stable error code for API responses and logs.
    pub fn code(&self) -> &'static str {
        match self {
            OtpError::Persistence { .. } => "PERSISTENCE_ERROR",
            OtpError::InvalidOrExpiredSession => "INVALID_OR_EXPIRED_SESSION",
            OtpError::AttemptsExceeded => "ATTEMPTS_EXCEEDED",
            OtpError::InvalidCode { .. } => "INVALID_CODE",
            OtpError::InvalidSession => "INVALID_SESSION",
            OtpError::Validation { .. } => "VALIDATION_ERROR",
        }
    }

    /// Shorthand for a persistence failure wrapping a storage error.
    pub fn persistence(err: impl std::fmt::Display) -> Self {
        OtpError::Persistence {
            message: err.to_string(),
        }
    }
}

pub type OtpResult<T> = Result<T, OtpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            OtpError::InvalidOrExpiredSession.code(),
            "INVALID_OR_EXPIRED_SESSION"
        );
        assert_eq!(OtpError::AttemptsExceeded.code(), "ATTEMPTS_EXCEEDED");
        assert_eq!(
            OtpError::InvalidCode {
                remaining_attempts: 2
            }
            .code(),
            "INVALID_CODE"
        );
    }

    #[test]
    fn test_invalid_code_message_carries_countdown() {
        let err = OtpError::InvalidCode {
            remaining_attempts: 1,
        };
        assert!(err.to_string().contains("1 attempt(s) remaining"));
    }

    #[test]
    fn test_persistence_wraps_source_message() {
        let err = OtpError::persistence("connection refused");
        assert!(err.to_string().contains("connection refused"));
    }
}
