//! OTP session entity gating a staged transaction.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

/// Maximum number of verification attempts allowed per code lifetime
pub const MAX_ATTEMPTS: i32 = 3;

/// Length of the one-time code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for a session (5 minutes)
pub const DEFAULT_TTL_MINUTES: i64 = 5;

/// Number of random bytes behind a session token (hex-encoded to 64 chars)
pub const TOKEN_BYTES: usize = 32;

/// A one-time-code session holding a staged, not-yet-executed transaction.
///
/// The session token is the lookup key and a bearer capability; the code is
/// the out-of-band secret. The staged payload is stored verbatim and never
/// interpreted here - transaction semantics belong to the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtpSession {
    /// High-entropy opaque token handed to the caller
    pub session_token: String,

    /// Account on whose behalf the staged transaction will execute
    pub user_id: String,

    /// Delivery address (email/phone) for the out-of-band channel
    pub user_contact: String,

    /// The staged transaction request, opaque to this subsystem
    pub staged_payload: serde_json::Value,

    /// The 6-digit one-time code
    pub code: String,

    /// Verification attempts made since creation or last resend
    pub attempts: i32,

    /// Attempt ceiling; reaching it invalidates the session
    pub max_attempts: i32,

    /// True once a correct code has been accepted (terminal)
    pub verified: bool,

    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,

    /// Absolute deadline after which the session is unusable
    pub expires_at: DateTime<Utc>,
}

impl OtpSession {
    /// Creates a new session with default policy (5 minute TTL, 3 attempts).
    pub fn new(
        user_id: impl Into<String>,
        user_contact: impl Into<String>,
        staged_payload: serde_json::Value,
    ) -> Self {
        Self::with_policy(
            user_id,
            user_contact,
            staged_payload,
            DEFAULT_TTL_MINUTES,
            MAX_ATTEMPTS,
        )
    }

    /// Creates a new session with an explicit TTL and attempt ceiling.
    pub fn with_policy(
        user_id: impl Into<String>,
        user_contact: impl Into<String>,
        staged_payload: serde_json::Value,
        ttl_minutes: i64,
        max_attempts: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            session_token: Self::generate_token(),
            user_id: user_id.into(),
            user_contact: user_contact.into(),
            staged_payload,
            code: Self::generate_code(),
            attempts: 0,
            max_attempts,
            verified: false,
            created_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
        }
    }

    /// Generates a uniformly random 6-digit code from the OS CSPRNG.
    pub fn generate_code() -> String {
        let mut rng = OsRng;
        // Rejection sampling keeps the distribution uniform over [0, 999999].
        let bound = u32::MAX - (u32::MAX % 1_000_000);
        let num = loop {
            let candidate = rng.next_u32();
            if candidate < bound {
                break candidate % 1_000_000;
            }
        };
        format!("{:06}", num)
    }

    /// Generates a 256-bit random token, hex-encoded.
    pub fn generate_token() -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Whether the session deadline has passed.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Whether the session can still gate a verification: not verified,
    /// not expired, attempts below the ceiling.
    pub fn is_active(&self) -> bool {
        !self.verified && !self.is_expired() && self.attempts < self.max_attempts
    }

    /// Attempts left on the current code (0 if exhausted).
    pub fn remaining_attempts(&self) -> i32 {
        (self.max_attempts - self.attempts).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_session() -> OtpSession {
        OtpSession::new(
            "u1",
            "user@example.com",
            json!({"type": "transfer", "amount": 500}),
        )
    }

    #[test]
    fn test_new_session() {
        let session = sample_session();

        assert_eq!(session.user_id, "u1");
        assert_eq!(session.code.len(), CODE_LENGTH);
        assert_eq!(session.session_token.len(), TOKEN_BYTES * 2);
        assert_eq!(session.attempts, 0);
        assert_eq!(session.max_attempts, MAX_ATTEMPTS);
        assert!(!session.verified);
        assert!(!session.is_expired());
        assert!(session.is_active());
        assert_eq!(
            session.expires_at,
            session.created_at + Duration::minutes(DEFAULT_TTL_MINUTES)
        );
    }

    #[test]
    fn test_generate_code_format() {
        for _ in 0..100 {
            let code = OtpSession::generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));

            let num: u32 = code.parse().expect("code should be numeric");
            assert!(num < 1_000_000);
        }
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens: Vec<String> = (0..100).map(|_| OtpSession::generate_token()).collect();
        let unique = tokens.iter().collect::<std::collections::HashSet<_>>().len();
        assert_eq!(unique, tokens.len());
    }

    #[test]
    fn test_payload_stored_verbatim() {
        let payload = json!({
            "type": "wire",
            "amount": 1250.50,
            "currency": "EUR",
            "recipient": {"iban": "DE89370400440532013000"}
        });
        let session = OtpSession::new("u1", "user@example.com", payload.clone());
        assert_eq!(session.staged_payload, payload);
    }

    #[test]
    fn test_remaining_attempts() {
        let mut session = sample_session();
        assert_eq!(session.remaining_attempts(), MAX_ATTEMPTS);

        session.attempts = 2;
        assert_eq!(session.remaining_attempts(), 1);

        session.attempts = MAX_ATTEMPTS;
        assert_eq!(session.remaining_attempts(), 0);
        assert!(!session.is_active());
    }

    #[test]
    fn test_expired_session_is_inactive() {
        let mut session = sample_session();
        session.expires_at = Utc::now() - Duration::seconds(1);

        assert!(session.is_expired());
        assert!(!session.is_active());
    }

    #[test]
    fn test_verified_session_is_inactive() {
        let mut session = sample_session();
        session.verified = true;
        assert!(!session.is_active());
    }

    #[test]
    fn test_serialization_round_trip() {
        let session = sample_session();
        let json = serde_json::to_string(&session).unwrap();
        let deserialized: OtpSession = serde_json::from_str(&json).unwrap();
        assert_eq!(session, deserialized);
    }
}
