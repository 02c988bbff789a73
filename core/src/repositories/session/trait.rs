//! Session repository trait defining the interface for OTP session persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::otp_session::OtpSession;
use crate::errors::OtpResult;

/// Repository contract for `OtpSession` persistence.
///
/// The session store is the only shared mutable resource in this
/// subsystem; every mutation goes through these operations. Two of them
/// carry atomicity obligations the implementation must honor:
///
/// - `create_session` removes any prior sessions for the same user and
///   inserts the new one in a single observable step, so two concurrent
///   creates for one user can never both leave a live session behind.
/// - `increment_attempts` is a guarded read-modify-write: the counter
///   only advances while it is below the ceiling, and the new value is
///   returned from the same atomic operation. Two parallel verify calls
///   can therefore never both slip past `max_attempts`.
#[async_trait]
pub trait OtpSessionRepository: Send + Sync {
    /// Atomically delete any sessions belonging to the session's user,
    /// then insert the new session.
    ///
    /// # Returns
    /// * `Ok(OtpSession)` - The persisted session
    /// * `Err(OtpError::Persistence)` - Storage failed; nothing was staged
    async fn create_session(&self, session: OtpSession) -> OtpResult<OtpSession>;

    /// Find a session by token that is not yet verified and not expired.
    ///
    /// This is the verification lookup predicate: absent, expired, and
    /// already-verified records are all `Ok(None)`.
    async fn find_active(&self, session_token: &str) -> OtpResult<Option<OtpSession>>;

    /// Find a session by token that is not yet verified, regardless of
    /// expiry. Used by the resend path, which issues a fresh deadline.
    async fn find_unverified(&self, session_token: &str) -> OtpResult<Option<OtpSession>>;

    /// Find a session by token regardless of state. Reserved for the
    /// privileged delivery read path.
    async fn find_by_token(&self, session_token: &str) -> OtpResult<Option<OtpSession>>;

    /// Atomically increment the attempt counter of an unverified session
    /// while it is still below its ceiling.
    ///
    /// # Returns
    /// * `Ok(Some(attempts))` - The counter after the increment
    /// * `Ok(None)` - No unverified session below the ceiling matched
    ///   (vanished, already verified, or ceiling already consumed)
    async fn increment_attempts(&self, session_token: &str) -> OtpResult<Option<i32>>;

    /// Mark an unverified session as verified (terminal).
    ///
    /// # Returns
    /// * `Ok(true)` - The session transitioned to verified
    /// * `Ok(false)` - No unverified session matched the token
    async fn mark_verified(&self, session_token: &str) -> OtpResult<bool>;

    /// Replace the code of an unverified session, resetting its attempt
    /// counter to zero and re-arming its deadline.
    async fn replace_code(
        &self,
        session_token: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> OtpResult<bool>;

    /// Delete a session by token.
    ///
    /// # Returns
    /// * `Ok(true)` - A session was removed
    /// * `Ok(false)` - No session matched
    async fn delete(&self, session_token: &str) -> OtpResult<bool>;

    /// Delete every session whose deadline has passed.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of sessions swept
    async fn delete_expired(&self) -> OtpResult<usize>;

    /// List all unverified, unexpired sessions for operational visibility.
    async fn list_active(&self) -> OtpResult<Vec<OtpSession>>;
}
