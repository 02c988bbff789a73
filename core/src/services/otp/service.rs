//! Main OTP authorization service implementation

use std::sync::Arc;

use constant_time_eq::constant_time_eq;
use tracing;

use crate::domain::entities::otp_session::OtpSession;
use crate::errors::{OtpError, OtpResult};
use crate::repositories::OtpSessionRepository;

use super::config::OtpServiceConfig;
use super::mask_contact;
use super::traits::NotificationDispatcher;
use super::types::{CreateSessionResult, DeliveryView, ResendResult, VerifiedSession};

/// Authorization service for OTP-gated transaction staging.
///
/// Stages a transaction payload behind a one-time code and releases it
/// only after correct code entry within the attempt ceiling and the TTL
/// window. The payload itself stays opaque; executing it is the caller's
/// business once `verify` succeeds.
pub struct OtpAuthorizationService<R: OtpSessionRepository, N: NotificationDispatcher> {
    /// Session store
    repository: Arc<R>,
    /// Out-of-band code delivery
    dispatcher: Arc<N>,
    /// Policy knobs (TTL, attempt ceiling)
    config: OtpServiceConfig,
}

impl<R: OtpSessionRepository, N: NotificationDispatcher> OtpAuthorizationService<R, N> {
    /// Create a new authorization service
    pub fn new(repository: Arc<R>, dispatcher: Arc<N>, config: OtpServiceConfig) -> Self {
        Self {
            repository,
            dispatcher,
            config,
        }
    }

    /// Stage a transaction behind a fresh one-time-code session.
    ///
    /// Any existing session for the user is removed in the same storage
    /// step, so at most one active session per user ever exists. The code
    /// is dispatched out-of-band; a delivery failure is logged and does
    /// not undo the staging.
    pub async fn create(
        &self,
        user_id: &str,
        user_contact: &str,
        staged_payload: serde_json::Value,
    ) -> OtpResult<CreateSessionResult> {
        if user_id.trim().is_empty() {
            return Err(OtpError::Validation {
                message: "user_id must not be empty".to_string(),
            });
        }
        if user_contact.trim().is_empty() {
            return Err(OtpError::Validation {
                message: "user_contact must not be empty".to_string(),
            });
        }

        let session = OtpSession::with_policy(
            user_id,
            user_contact,
            staged_payload,
            self.config.ttl_minutes,
            self.config.max_attempts,
        );

        let session = self.repository.create_session(session).await?;

        tracing::info!(
            user_id = user_id,
            contact = %mask_contact(user_contact),
            expires_at = %session.expires_at,
            event = "otp_session_created",
            "Staged transaction behind new OTP session"
        );

        self.dispatch_code(&session.user_contact, &session.code)
            .await;

        Ok(CreateSessionResult {
            session_token: session.session_token,
            code: session.code,
            expires_at: session.expires_at,
        })
    }

    /// Verify a submitted code against the session behind the token.
    ///
    /// Releases the staged payload on a match. The attempt counter
    /// advances on every call, success included; the ceiling check runs
    /// before the current attempt is consumed, and reaching the ceiling
    /// destroys the session regardless of later correct codes.
    pub async fn verify(&self, session_token: &str, code: &str) -> OtpResult<VerifiedSession> {
        let session = self
            .repository
            .find_active(session_token)
            .await?
            .ok_or(OtpError::InvalidOrExpiredSession)?;

        if session.attempts >= session.max_attempts {
            self.destroy_exhausted(session_token, &session).await?;
            return Err(OtpError::AttemptsExceeded);
        }

        // Single guarded increment; two racing calls cannot both slip
        // past the ceiling.
        let attempts = match self.repository.increment_attempts(session_token).await? {
            Some(attempts) => attempts,
            None => {
                // The guard refused: a concurrent call consumed the
                // ceiling, or the session vanished underneath us.
                return match self.repository.find_unverified(session_token).await? {
                    Some(s) if s.attempts >= s.max_attempts => {
                        self.destroy_exhausted(session_token, &s).await?;
                        Err(OtpError::AttemptsExceeded)
                    }
                    _ => Err(OtpError::InvalidOrExpiredSession),
                };
            }
        };

        if !constant_time_eq(session.code.as_bytes(), code.as_bytes()) {
            let remaining = (session.max_attempts - attempts).max(0);
            if remaining == 0 {
                // This failure consumed the last attempt; the session is
                // destroyed on the spot, a later correct code changes nothing.
                self.destroy_exhausted(session_token, &session).await?;
                return Err(OtpError::AttemptsExceeded);
            }
            tracing::warn!(
                user_id = %session.user_id,
                remaining_attempts = remaining,
                event = "otp_verification_failed",
                "Incorrect one-time code submitted"
            );
            return Err(OtpError::InvalidCode {
                remaining_attempts: remaining,
            });
        }

        if !self.repository.mark_verified(session_token).await? {
            // Lost the race against another successful verify or a delete.
            return Err(OtpError::InvalidOrExpiredSession);
        }

        tracing::info!(
            user_id = %session.user_id,
            event = "otp_verified",
            "One-time code accepted, releasing staged payload"
        );

        // The verified record stays behind as an audit trail until the
        // expiry sweep collects it.
        Ok(VerifiedSession {
            user_id: session.user_id,
            staged_payload: session.staged_payload,
        })
    }

    /// Issue a replacement code for an unverified session.
    ///
    /// Expiry is deliberately not checked: the resend hands out a new
    /// deadline, reviving a lapsed session. Attempts reset to zero - a
    /// user who exhausted retries gets a fresh code without restaging
    /// the transaction.
    pub async fn resend(&self, session_token: &str) -> OtpResult<ResendResult> {
        let session = self
            .repository
            .find_unverified(session_token)
            .await?
            .ok_or(OtpError::InvalidSession)?;

        let code = OtpSession::generate_code();
        let expires_at = chrono::Utc::now() + chrono::Duration::minutes(self.config.ttl_minutes);

        if !self
            .repository
            .replace_code(session_token, &code, expires_at)
            .await?
        {
            return Err(OtpError::InvalidSession);
        }

        tracing::info!(
            user_id = %session.user_id,
            contact = %mask_contact(&session.user_contact),
            expires_at = %expires_at,
            event = "otp_code_resent",
            "Replaced one-time code and re-armed deadline"
        );

        self.dispatch_code(&session.user_contact, &code).await;

        Ok(ResendResult { code, expires_at })
    }

    /// Sweep sessions whose deadline has passed.
    ///
    /// Housekeeping only: `verify` enforces expiry synchronously, so this
    /// sweep is idempotent and safe to repeat or skip.
    pub async fn cleanup_expired(&self) -> OtpResult<usize> {
        let swept = self.repository.delete_expired().await?;
        if swept > 0 {
            tracing::info!(
                swept = swept,
                event = "otp_sessions_swept",
                "Removed expired OTP sessions"
            );
        }
        Ok(swept)
    }

    /// Privileged read for the delivery subsystem and support tooling.
    ///
    /// Returns the plaintext code and contact details for manual or
    /// alternate delivery. Never expose this on the end user's own
    /// request path - the verifying party must not read the secret over
    /// the channel it will submit it on.
    pub async fn fetch_for_delivery(&self, session_token: &str) -> OtpResult<DeliveryView> {
        let session = self
            .repository
            .find_by_token(session_token)
            .await?
            .ok_or(OtpError::InvalidSession)?;

        tracing::info!(
            user_id = %session.user_id,
            event = "otp_privileged_read",
            "Code read back through the privileged delivery path"
        );

        Ok(DeliveryView {
            code: session.code,
            user_id: session.user_id,
            user_contact: session.user_contact,
        })
    }

    /// All unverified, unexpired sessions, for operational visibility.
    pub async fn list_active(&self) -> OtpResult<Vec<OtpSession>> {
        self.repository.list_active().await
    }

    /// Administrative removal of a session.
    pub async fn delete(&self, session_token: &str) -> OtpResult<()> {
        if self.repository.delete(session_token).await? {
            tracing::info!(event = "otp_session_deleted", "Session removed by admin");
            Ok(())
        } else {
            Err(OtpError::InvalidSession)
        }
    }

    /// Delete a session that consumed its attempt ceiling.
    async fn destroy_exhausted(&self, session_token: &str, session: &OtpSession) -> OtpResult<()> {
        self.repository.delete(session_token).await?;
        tracing::warn!(
            user_id = %session.user_id,
            event = "otp_attempts_exceeded",
            "Attempt ceiling reached, session destroyed"
        );
        Ok(())
    }

    /// Fire-and-forget out-of-band dispatch.
    async fn dispatch_code(&self, user_contact: &str, code: &str) {
        match self.dispatcher.deliver_code(user_contact, code).await {
            Ok(message_id) => {
                tracing::debug!(
                    contact = %mask_contact(user_contact),
                    message_id = %message_id,
                    event = "otp_code_dispatched",
                    "One-time code handed to delivery channel"
                );
            }
            Err(e) => {
                // The session exists even if delivery failed; the
                // privileged read path covers manual recovery.
                tracing::error!(
                    contact = %mask_contact(user_contact),
                    error = %e,
                    event = "otp_delivery_failed",
                    "Out-of-band delivery failed"
                );
            }
        }
    }
}
